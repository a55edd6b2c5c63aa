//! Address and vault fixtures.

/// Collection of commonly used test fixtures.
pub struct TestFixtures;

impl TestFixtures {
    /// Mainnet address with the current `spark` prefix.
    pub const MAINNET_ADDRESS: &'static str =
        "spark1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3u9ftwa";

    /// Identity key encoded in [`Self::MAINNET_ADDRESS`].
    pub const MAINNET_PUBKEY: &'static str =
        "037c7a8b9b1411652f0532cddb9367846be97699dddb804c79eef53c209b02cc91";

    /// Mainnet address with the legacy `sp` prefix.
    pub const LEGACY_ADDRESS: &'static str =
        "sp1pgss9qfk8ygtphqqzkj2yhn43k3s7r3g8z822ffvpcm38ym094800574233rzd";

    /// Identity key encoded in [`Self::LEGACY_ADDRESS`].
    pub const LEGACY_PUBKEY: &'static str =
        "0281363910b0dc0015a4a25e758da30f0e28388ea5252c0e3713936f2d4ef7d3d5";

    /// Regtest address carrying [`Self::MAINNET_PUBKEY`].
    pub const REGTEST_ADDRESS: &'static str =
        "sparkrt1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3wr8hzz";

    /// Bare 33-byte payload, no protobuf framing.
    pub const BARE_PAYLOAD_ADDRESS: &'static str =
        "spark1qd784zumzsgk2tc9xtxahym8s347ja5emhdcqnream6ncgymqtxfzuk5hux";

    /// [`Self::MAINNET_ADDRESS`] with a broken checksum.
    pub const BAD_CHECKSUM_ADDRESS: &'static str =
        "spark1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3u9ftwq";

    /// Same payload as [`Self::MAINNET_ADDRESS`] under the original bech32 checksum.
    pub const BECH32_VARIANT_ADDRESS: &'static str =
        "spark1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3fee8tl";

    /// Valid bech32m string with an empty payload.
    pub const EMPTY_PAYLOAD_ADDRESS: &'static str = "spark1qrl7k6e";

    /// Strings that must never be recognized as Spark addresses.
    pub const NOT_ADDRESSES: &'static [&'static str] = &[
        "bc1pm6lqlel3qxefsx0v39nshtghasvvp6ghn3e5hd5q280j5m9h7csqrkzssu",
        "spark1qw2e3r4t5y6u7i8o9p0",
        "invalid-address",
        "",
        "123456",
    ];

    /// Known-answer vector for the vault.
    pub fn vault_vector() -> KnownAnswer {
        KnownAnswer {
            device_salt: "53B63311-D2D5-4C62-9F7F-28F25447B825",
            password: "password",
            plaintext: "abandon ability able",
            encoded: "000102030405060708090a0b0c0d0e0f:027b758b4897eaa37727e5a8b259b1e0:73983d58227e3918344ad7f0d197a5b01ce820ed",
        }
    }
}

/// A sealed value with everything needed to open it.
#[derive(Clone, Copy, Debug)]
pub struct KnownAnswer {
    /// Device salt in the store
    pub device_salt: &'static str,
    /// Password
    pub password: &'static str,
    /// Expected plaintext
    pub plaintext: &'static str,
    /// `iv:tag:ciphertext`
    pub encoded: &'static str,
}
