//! Share links: the `(origin, identifier, key)` triple as a URL or a command line.
//!
//! ```text
//! https://<host>/<identifier>#<key>
//! ccdrop -i <identifier> -k <key> -u <origin> get
//! ```
//!
//! The key only ever travels in the URL fragment (or the `-k` argument). The
//! fragment is resolved locally and never sent in a request; the transfer
//! client accepts a [`ShareId`], not a link, so it cannot leak.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::crypto::SymmetricKey;
use crate::error::ShareError;
use crate::transfer::ShareId;

/// Program name used in the command form.
pub const TOOL_NAME: &str = "ccdrop";

/// A decoded share link.
///
/// The key is held in its transport encoding; [`ShareLink::key`] turns it
/// into a [`SymmetricKey`] when the receiver is ready to decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    origin: String,
    id: ShareId,
    key: String,
}

impl ShareLink {
    /// Build a link for a freshly uploaded share.
    ///
    /// `origin` is stored in its canonical form (see [`canonical_origin`]), so
    /// the link decodes back to an equal value.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if `origin` is not a bare origin.
    pub fn new(origin: &str, id: ShareId, key: &SymmetricKey) -> Result<Self, ShareError> {
        Ok(Self {
            origin: canonical_origin(origin)?,
            id,
            key: key.encode(),
        })
    }

    /// Assemble a link from separately supplied parts, e.g. the `-i/-k/-u` flags.
    ///
    /// The origin is held to the same rules as in [`ShareLink::from_url`].
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if any part is empty or `origin` is
    /// not a bare origin.
    pub fn from_parts(origin: &str, id: &str, key: &str) -> Result<Self, ShareError> {
        let origin = canonical_origin(origin)?;
        if key.is_empty() {
            return Err(ShareError::InvalidLink("missing key"));
        }
        let id = ShareId::new(id).map_err(|_| ShareError::InvalidLink("missing share identifier"))?;
        Ok(Self {
            origin,
            id,
            key: key.to_owned(),
        })
    }

    /// Serialized `scheme://host[:port]` of the relay.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Identifier the relay assigned to the frame.
    pub fn id(&self) -> &ShareId {
        &self.id
    }

    /// The key exactly as it appears in the fragment.
    pub fn encoded_key(&self) -> &str {
        &self.key
    }

    /// Decode the carried key.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::MalformedKey`] if the fragment is not a valid key encoding.
    pub fn key(&self) -> Result<SymmetricKey, ShareError> {
        SymmetricKey::decode(&self.key)
    }

    /// `origin/identifier#key`
    pub fn to_url(&self) -> String {
        format!("{}/{}#{}", self.origin, self.id, self.key)
    }

    /// `ccdrop -i identifier -k key -u origin get`
    pub fn to_command(&self) -> String {
        format!(
            "{TOOL_NAME} -i {} -k {} -u {} get",
            self.id, self.key, self.origin
        )
    }

    /// Decode the URL form.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if the locator is not an absolute
    /// URL with a scheme and host, if the path is not exactly one non-empty
    /// segment, if it carries a query, or if the fragment is empty.
    pub fn from_url(locator: &str) -> Result<Self, ShareError> {
        let url = Url::parse(locator.trim())
            .map_err(|_| ShareError::InvalidLink("not an absolute URL"))?;
        let origin = tuple_origin(&url)?;

        let id = url.path().trim_start_matches('/');
        if id.is_empty() {
            return Err(ShareError::InvalidLink("missing share identifier"));
        }
        if id.contains('/') {
            return Err(ShareError::InvalidLink(
                "share identifier must be a single path segment",
            ));
        }
        if url.query().is_some() {
            return Err(ShareError::InvalidLink("unexpected query string"));
        }

        let key = url.fragment().unwrap_or_default();
        if key.is_empty() {
            return Err(ShareError::InvalidLink("missing key fragment"));
        }

        Ok(Self {
            origin,
            id: ShareId::new(id)?,
            key: key.to_owned(),
        })
    }

    /// Decode the command form.
    ///
    /// Leading program words (`ccdrop`, `cargo run --`) are skipped. Flags may
    /// be short or long and appear in any order; the `get` subcommand is required.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] on a missing flag, a flag without a
    /// value, an unknown flag, or a missing `get`.
    pub fn from_command(command: &str) -> Result<Self, ShareError> {
        let mut id = None;
        let mut key = None;
        let mut origin = None;
        let mut saw_get = false;

        let mut tokens = command.split_whitespace();
        while let Some(token) = tokens.next() {
            match token {
                "-i" | "--id" => id = Some(flag_value(&mut tokens)?),
                "-k" | "--key" => key = Some(flag_value(&mut tokens)?),
                "-u" | "--url" => origin = Some(flag_value(&mut tokens)?),
                "get" => saw_get = true,
                "--" => {}
                flag if flag.starts_with('-') => {
                    return Err(ShareError::InvalidLink("unknown flag in command"))
                }
                _ => {}
            }
        }

        if !saw_get {
            return Err(ShareError::InvalidLink("command is missing `get`"));
        }
        let origin = origin.ok_or(ShareError::InvalidLink("command is missing -u"))?;
        let id = id.ok_or(ShareError::InvalidLink("command is missing -i"))?;
        let key = key.ok_or(ShareError::InvalidLink("command is missing -k"))?;
        Self::from_parts(origin, id, key)
    }

    /// Decode either form. Input containing whitespace is treated as a command.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if neither form decodes.
    pub fn parse(input: &str) -> Result<Self, ShareError> {
        let input = input.trim();
        if input.contains(char::is_whitespace) {
            Self::from_command(input)
        } else {
            Self::from_url(input)
        }
    }
}

/// Reduce `origin` to `scheme://host[:port]`: lowercase host, default port
/// dropped, no trailing `/`.
///
/// # Errors
///
/// Returns [`ShareError::InvalidLink`] if `origin` has no scheme and host, or
/// carries a path, query, or fragment. Links are built on the bare origin, so
/// anything after it would be lost between upload and download.
pub fn canonical_origin(origin: &str) -> Result<String, ShareError> {
    let origin = origin.trim();
    if origin.is_empty() {
        return Err(ShareError::InvalidLink("missing server origin"));
    }
    let url =
        Url::parse(origin).map_err(|_| ShareError::InvalidLink("server origin is not a URL"))?;
    let serialized = tuple_origin(&url)?;
    if !matches!(url.path(), "" | "/") {
        return Err(ShareError::InvalidLink("server origin must not have a path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ShareError::InvalidLink(
            "server origin must not have a query or fragment",
        ));
    }
    Ok(serialized)
}

fn tuple_origin(url: &Url) -> Result<String, ShareError> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ShareError::InvalidLink("no recognizable origin"));
    }
    Ok(origin.ascii_serialization())
}

fn flag_value<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<&'a str, ShareError> {
    tokens
        .next()
        .ok_or(ShareError::InvalidLink("flag is missing its value"))
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl FromStr for ShareLink {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.test";

    fn link_for(key: &SymmetricKey) -> ShareLink {
        ShareLink::new(ORIGIN, ShareId::new("abc123").unwrap(), key).unwrap()
    }

    #[test]
    fn url_round_trip() {
        let key = SymmetricKey::generate().unwrap();
        let url = link_for(&key).to_url();
        let decoded = ShareLink::from_url(&url).unwrap();
        assert_eq!(decoded.id().as_str(), "abc123");
        assert_eq!(decoded.encoded_key(), key.encode());
        assert_eq!(decoded.origin(), ORIGIN);
        assert_eq!(decoded.key().unwrap(), key);
    }

    #[test]
    fn url_shape() {
        let key = SymmetricKey::from_bytes([0u8; 32]);
        let url = link_for(&key).to_url();
        assert_eq!(url, format!("{ORIGIN}/abc123#{}", key.encode()));
    }

    #[test]
    fn command_round_trip() {
        let key = SymmetricKey::generate().unwrap();
        let link = link_for(&key);
        let command = link.to_command();
        assert!(command.starts_with("ccdrop -i abc123 -k "));
        assert!(command.ends_with(" -u https://example.test get"));
        assert_eq!(ShareLink::from_command(&command).unwrap(), link);
    }

    #[test]
    fn url_and_command_agree() {
        let key = SymmetricKey::generate().unwrap();
        let link = link_for(&key);
        assert_eq!(
            ShareLink::parse(&link.to_url()).unwrap(),
            ShareLink::parse(&link.to_command()).unwrap()
        );
    }

    #[test]
    fn origin_with_port_round_trips() {
        let key = SymmetricKey::generate().unwrap();
        let link =
            ShareLink::new("http://localhost:3331/", ShareId::new("XyZ9").unwrap(), &key).unwrap();
        assert_eq!(link.origin(), "http://localhost:3331");
        assert_eq!(ShareLink::from_url(&link.to_url()).unwrap(), link);
    }

    #[test]
    fn non_canonical_origins_round_trip() {
        let key = SymmetricKey::generate().unwrap();
        for origin in [
            "HTTPS://Drop.Example",
            "https://drop.example:443",
            "https://drop.example/",
        ] {
            let link = ShareLink::new(origin, ShareId::new("abc123").unwrap(), &key).unwrap();
            assert_eq!(link.origin(), "https://drop.example", "{origin}");
            assert_eq!(ShareLink::from_url(&link.to_url()).unwrap(), link, "{origin}");
            assert_eq!(
                ShareLink::from_command(&link.to_command()).unwrap(),
                link,
                "{origin}"
            );
        }
    }

    #[test]
    fn origin_with_path_is_rejected_before_building_a_link() {
        let key = SymmetricKey::generate().unwrap();
        for origin in [
            "https://drop.example/app",
            "https://drop.example/?q=1",
            "https://drop.example/#frag",
        ] {
            assert!(
                matches!(
                    ShareLink::new(origin, ShareId::new("abc123").unwrap(), &key),
                    Err(ShareError::InvalidLink(_))
                ),
                "{origin}"
            );
        }
    }

    #[test]
    fn command_with_non_url_origin_is_invalid() {
        for command in [
            "ccdrop -i abc -k KEY -u notaurl get",
            "ccdrop -i abc -k KEY -u data:text/plain,x get",
            "ccdrop -i abc -k KEY -u https://drop.example/app get",
        ] {
            assert!(
                matches!(
                    ShareLink::from_command(command),
                    Err(ShareError::InvalidLink(_))
                ),
                "{command}"
            );
        }
    }

    #[test]
    fn from_parts_canonicalizes_origin() {
        let link = ShareLink::from_parts("HTTP://LOCALHOST:80/", "abc", "KEY").unwrap();
        assert_eq!(link.origin(), "http://localhost");
    }

    #[test]
    fn key_starting_with_hyphen_survives_command_form() {
        let key = "-".repeat(43);
        let command = format!("ccdrop -i abc -k {key} -u {ORIGIN} get");
        let link = ShareLink::from_command(&command).unwrap();
        assert_eq!(link.encoded_key(), key);
    }

    #[test]
    fn command_accepts_long_flags_in_any_order() {
        let command = format!("cargo run -- get --url {ORIGIN} --key KEY --id abc");
        let link = ShareLink::from_command(&command).unwrap();
        assert_eq!(link.id().as_str(), "abc");
        assert_eq!(link.encoded_key(), "KEY");
    }

    #[test]
    fn empty_locator_is_invalid() {
        assert!(matches!(ShareLink::parse(""), Err(ShareError::InvalidLink(_))));
        assert!(matches!(ShareLink::from_url(""), Err(ShareError::InvalidLink(_))));
    }

    #[test]
    fn missing_fragment_is_invalid() {
        assert!(matches!(
            ShareLink::from_url("https://example.test/abc123"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_url("https://example.test/abc123#"),
            Err(ShareError::InvalidLink(_))
        ));
    }

    #[test]
    fn missing_identifier_is_invalid() {
        assert!(matches!(
            ShareLink::from_url("https://example.test/#key"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_url("https://example.test#key"),
            Err(ShareError::InvalidLink(_))
        ));
    }

    #[test]
    fn relative_or_opaque_locators_are_invalid() {
        assert!(matches!(
            ShareLink::from_url("abc123#key"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_url("/abc123#key"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_url("data:text/plain,abc#key"),
            Err(ShareError::InvalidLink(_))
        ));
    }

    #[test]
    fn nested_path_and_query_are_invalid() {
        assert!(matches!(
            ShareLink::from_url("https://example.test/get/abc#key"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_url("https://example.test/abc?k=v#key"),
            Err(ShareError::InvalidLink(_))
        ));
    }

    #[test]
    fn command_missing_parts_is_invalid() {
        assert!(matches!(
            ShareLink::from_command("ccdrop -i abc -k KEY get"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_command("ccdrop -i abc -k KEY -u https://h"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_command("ccdrop get -i abc -u https://h -k"),
            Err(ShareError::InvalidLink(_))
        ));
        assert!(matches!(
            ShareLink::from_command("ccdrop -x 1 -i a -k b -u https://h get"),
            Err(ShareError::InvalidLink(_))
        ));
    }

    #[test]
    fn malformed_key_surfaces_on_key_access() {
        let link = ShareLink::from_url("https://example.test/abc#not-a-key").unwrap();
        assert!(matches!(link.key(), Err(ShareError::MalformedKey)));
    }

    #[test]
    fn display_is_url_form() {
        let key = SymmetricKey::generate().unwrap();
        let link = link_for(&key);
        assert_eq!(link.to_string(), link.to_url());
        let parsed: ShareLink = link.to_string().parse().unwrap();
        assert_eq!(parsed, link);
    }
}
