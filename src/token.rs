use anyhow::bail;

/// Scheme prefix reserved for command tokens. Any input starting with it is a
/// previously issued token, never free-text search input.
pub const TOKEN_SCHEME: &str = "opener-for-asana:";

/// What to do with input that lacks the token scheme prefix. The two host
/// environments historically disagreed; both behaviors are kept selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Missing prefix is a decode error.
    Strict,
    /// Missing prefix means the input is literal free text.
    Lenient,
}

/// Result of decoding committed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A task identifier recovered from a token.
    TaskGid(String),
    /// Input that never was a token (lenient mode only).
    FreeText(String),
}

/// Build the opaque token carried through the host's free-text channel.
pub fn encode_token(gid: &str) -> String {
    format!("{TOKEN_SCHEME}{}", urlencoding::encode(gid))
}

/// Strip the scheme prefix and percent-decode the identifier.
pub fn decode_token(input: &str, mode: DecodeMode) -> anyhow::Result<Decoded> {
    match input.strip_prefix(TOKEN_SCHEME) {
        Some(encoded) => {
            let gid = urlencoding::decode(encoded)?;
            Ok(Decoded::TaskGid(gid.into_owned()))
        }
        None => match mode {
            DecodeMode::Strict => bail!("input is not an {TOKEN_SCHEME} token: {input}"),
            DecodeMode::Lenient => Ok(Decoded::FreeText(input.to_string())),
        },
    }
}
