use std::borrow::Cow;

/// Combine a namespace and one or more keys into a full byte path.
///
/// The namespace and all keys other than the last one are prefixed with their
/// lengths (2 bytes big-endian), so that we know where a key ends and where
/// the next one starts:
///
/// ```plain
/// len(namespace) | namespace | len(key1) | key1 | len(key2) | key2 | key3
/// ```
///
/// Panics if any key is longer than `u16::MAX` bytes. Identifiers are capped
/// far below that, so the keys this crate builds never hit it.
#[doc(hidden)]
pub fn nested_namespaces_with_key(
    maybe_namespace: Option<&[u8]>,
    prefixes: &[Cow<[u8]>],
    maybe_key: Option<&Cow<[u8]>>,
) -> Vec<u8> {
    let size = maybe_namespace.map_or(0, |ns| ns.len() + 2)
        + prefixes.iter().map(|p| p.len() + 2).sum::<usize>()
        + maybe_key.map_or(0, |key| key.len());

    let mut out = Vec::with_capacity(size);
    if let Some(namespace) = maybe_namespace {
        out.extend_from_slice(&encode_length(namespace));
        out.extend_from_slice(namespace);
    }
    for prefix in prefixes {
        out.extend_from_slice(&encode_length(prefix));
        out.extend_from_slice(prefix);
    }
    if let Some(key) = maybe_key {
        out.extend_from_slice(key);
    }
    out
}

/// Two big-endian bytes representing the length of the byte slice.
#[doc(hidden)]
pub fn encode_length<B>(bytes: B) -> [u8; 2]
where
    B: AsRef<[u8]>,
{
    let len = bytes.as_ref().len();
    let Ok(len) = u16::try_from(len) else {
        panic!("can't encode length: {len} > {}", u16::MAX);
    };

    len.to_be_bytes()
}

/// Smallest byte string that is greater than every string with the given
/// prefix. Used as the exclusive upper bound when iterating a namespace.
///
/// The namespaces built by this crate always start with a two-byte length
/// that is far below `0xffff`, so the bytes are never all `0xff`.
#[doc(hidden)]
pub fn increment_last_byte(mut bytes: Vec<u8>) -> Vec<u8> {
    debug_assert!(
        bytes.iter().any(|x| *x != u8::MAX),
        "bytes are entirely 255"
    );
    for byte in bytes.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            break;
        }
    }
    bytes
}

/// Append a zero byte, producing the immediate successor of the byte string.
#[doc(hidden)]
pub fn extend_one_byte(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.push(0);
    bytes
}

#[doc(hidden)]
pub fn concat(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(namespace.len() + key.len());
    out.extend_from_slice(namespace);
    out.extend_from_slice(key);
    out
}

/// The reverse of [`concat`]. Only checks that the key actually starts with
/// the namespace in debug builds.
#[doc(hidden)]
pub fn trim(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(
        key.starts_with(namespace),
        "byte slice doesn't start with the given namespace"
    );
    key[namespace.len()..].to_vec()
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test]
    fn nesting_prefixes_lengths() {
        let prefixes = [Cow::Borrowed(b"transfer".as_slice()), Cow::Borrowed(b"ch".as_slice())];
        let key = Cow::Borrowed(&[0_u8, 7][..]);
        let path = nested_namespaces_with_key(Some(b"ns".as_slice()), &prefixes, Some(&key));

        let mut expect = vec![0, 2];
        expect.extend_from_slice(b"ns");
        expect.extend_from_slice(&[0, 8]);
        expect.extend_from_slice(b"transfer");
        expect.extend_from_slice(&[0, 2]);
        expect.extend_from_slice(b"ch");
        expect.extend_from_slice(&[0, 7]);

        assert_eq!(path, expect);
    }

    #[test_case(vec![0, 1], vec![0, 2]; "simple")]
    #[test_case(vec![0, 255], vec![1, 0]; "carry")]
    #[test_case(vec![3, 255, 255], vec![4, 0, 0]; "double carry")]
    fn incrementing_last_byte(input: Vec<u8>, expect: Vec<u8>) {
        assert_eq!(increment_last_byte(input), expect);
    }
}
