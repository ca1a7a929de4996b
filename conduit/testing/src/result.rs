use {
    conduit_channel::{ChannelError, ErrorKind},
    std::fmt::Debug,
};

/// Assertions on the results of channel operations, so that tests read as a
/// single expression.
pub trait ResultExt: Sized {
    type Success;

    /// Ensure the result is ok; return the value.
    fn should_succeed(self) -> Self::Success;

    /// Ensure the result is ok, and matches the expected value.
    fn should_succeed_and_equal<U>(self, expect: U) -> Self::Success
    where
        Self::Success: Debug + PartialEq<U>,
        U: Debug,
    {
        let success = self.should_succeed();
        assert_eq!(
            success, expect,
            "success as expected, but with different value! expecting: {expect:?}, got: {success:?}"
        );
        success
    }

    /// Ensure the result is an error; return it.
    fn should_fail(self) -> ChannelError;

    /// Ensure the result is an error of the given kind.
    fn should_fail_with_kind(self, kind: ErrorKind) -> ChannelError {
        let error = self.should_fail();
        assert_eq!(
            error.kind(),
            kind,
            "fail as expected, but with wrong kind! expecting: {kind}, got: {error}"
        );
        error
    }

    /// Ensure the result is an error whose message contains the given text.
    fn should_fail_with_error<U>(self, expect: U) -> ChannelError
    where
        U: ToString,
    {
        let error = self.should_fail();
        let expect = expect.to_string();
        assert!(
            error.to_string().contains(&expect),
            "fail as expected, but with wrong error! expecting: {expect}, got: {error}"
        );
        error
    }
}

impl<T> ResultExt for Result<T, ChannelError>
where
    T: Debug,
{
    type Success = T;

    fn should_succeed(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("expecting ok, got error: {err}"),
        }
    }

    fn should_fail(self) -> ChannelError {
        match self {
            Err(err) => err,
            Ok(value) => panic!("expecting error, got ok: {value:?}"),
        }
    }
}
