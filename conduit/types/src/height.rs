use {
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// A block height, qualified by the revision of the chain it belongs to.
///
/// Ordering compares the revision number first, then the revision height.
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct Height {
    pub revision_number: u64,
    pub revision_height: u64,
}

impl Height {
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }
}

impl Display for Height {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// The height a query is to be answered at.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryHeight {
    #[default]
    Latest,
    Specific(Height),
}

impl From<Height> for QueryHeight {
    fn from(height: Height) -> Self {
        QueryHeight::Specific(height)
    }
}

/// Whether a query should return a proof alongside the value.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncludeProof {
    Yes,
    #[default]
    No,
}

impl IncludeProof {
    pub fn is_yes(self) -> bool {
        self == IncludeProof::Yes
    }
}

impl From<bool> for IncludeProof {
    fn from(prove: bool) -> Self {
        if prove {
            IncludeProof::Yes
        } else {
            IncludeProof::No
        }
    }
}

/// Extract the revision number from a chain id of the form `{name}-{revision}`,
/// e.g. `cosmoshub-4` has revision 4. Chain ids not of this form are at
/// revision 0.
pub fn revision_number_from_chain_id(chain_id: &str) -> u64 {
    let Some((name, revision)) = chain_id.rsplit_once('-') else {
        return 0;
    };

    if name.is_empty() || revision.is_empty() || !revision.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }

    revision.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case("cosmoshub-4", 4; "simple")]
    #[test_case("evm-chain-12", 12; "dashes in name")]
    #[test_case("localnet", 0; "no revision")]
    #[test_case("-3", 0; "empty name")]
    #[test_case("chain-+3", 0; "sign is not a digit")]
    #[test_case("chain-99999999999999999999", 0; "overflow")]
    fn parsing_revision_numbers(chain_id: &str, expect: u64) {
        assert_eq!(revision_number_from_chain_id(chain_id), expect);
    }

    #[test]
    fn heights_order_by_revision_first() {
        assert!(Height::new(1, 100) < Height::new(2, 1));
        assert!(Height::new(1, 5) < Height::new(1, 6));
        assert_eq!(Height::new(3, 17).to_string(), "3-17");
    }
}
