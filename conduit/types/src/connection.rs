use {
    crate::{Binary, ClientId, ConnectionId},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// The parts of a connection end that channel queries need: which light
/// client the connection is verified by, and what it's paired with on the
/// counterparty chain.
#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Hash,
)]
pub struct ConnectionEnd {
    pub client_id: ClientId,
    pub counterparty: ConnectionCounterparty,
}

#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Hash,
)]
pub struct ConnectionCounterparty {
    pub client_id: ClientId,
    /// Unknown until the counterparty has executed its side of the handshake.
    pub connection_id: Option<ConnectionId>,
}

/// The state of a light client together with its identifier.
///
/// The state is kept in the encoding of the client implementation that owns
/// it; this layer doesn't interpret it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedClientState {
    pub client_id: ClientId,
    pub client_state: Binary,
}

impl IdentifiedClientState {
    pub fn new(client_id: ClientId, client_state: Binary) -> Self {
        Self {
            client_id,
            client_state,
        }
    }
}
