//! SDP offer attribute extraction
//!
//! The relay only needs four values from a browser offer: the ICE
//! credentials, the DTLS certificate fingerprint and the media stream id.
//! [`PrefixScanParser`] pulls them out with a line-by-line prefix scan and
//! makes no attempt to validate the rest of the description.
//!
//! The scan sits behind the [`OfferParser`] trait so a full grammar-based
//! parser can replace it without touching answer synthesis or the relay.

use tracing::{debug, warn};

use crate::error::{SdpError, SdpResult};

const ICE_UFRAG_PREFIX: &str = "a=ice-ufrag:";
const ICE_PWD_PREFIX: &str = "a=ice-pwd:";
const FINGERPRINT_PREFIX: &str = "a=fingerprint:";
const MSID_PREFIX: &str = "a=msid:";

/// Line terminator convention of an SDP document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\r\n`, as RFC 8866 requires
    #[default]
    Crlf,
    /// Bare `\n`
    Lf,
}

impl LineEnding {
    /// Convention used by `text`; CRLF unless no line ends in `\r\n`
    pub fn detect(text: &str) -> Self {
        if text.contains('\n') && !text.contains("\r\n") {
            LineEnding::Lf
        } else {
            LineEnding::Crlf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Values extracted from an SDP offer
///
/// Every attribute is optional: an offer lacking one still parses, and
/// it is up to the consumer to decide whether the gap is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferAttributes {
    /// ICE username fragment (`a=ice-ufrag`)
    pub ice_ufrag: Option<String>,
    /// ICE password (`a=ice-pwd`)
    pub ice_pwd: Option<String>,
    /// Certificate fingerprint, hash algorithm and hex digest (`a=fingerprint`)
    pub fingerprint: Option<String>,
    /// Media stream id, the first token of `a=msid`
    pub msid: Option<String>,
    /// Line terminator the offer was written with
    pub line_ending: LineEnding,
}

impl OfferAttributes {
    /// Names of the attributes absent from the offer
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ice_ufrag.is_none() {
            missing.push("ice-ufrag");
        }
        if self.ice_pwd.is_none() {
            missing.push("ice-pwd");
        }
        if self.fingerprint.is_none() {
            missing.push("fingerprint");
        }
        if self.msid.is_none() {
            missing.push("msid");
        }
        missing
    }
}

/// Extracts [`OfferAttributes`] from raw offer text
pub trait OfferParser: Send + Sync {
    /// Parse an offer
    ///
    /// # Errors
    ///
    /// * `SdpError::EmptyOffer` - the text is empty or whitespace
    /// * `SdpError::NotSdp` - the text does not begin with a `v=` line
    fn parse(&self, offer: &str) -> SdpResult<OfferAttributes>;
}

/// Lenient parser that scans each line for the four attribute prefixes
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixScanParser;

impl PrefixScanParser {
    pub fn new() -> Self {
        Self
    }
}

impl OfferParser for PrefixScanParser {
    fn parse(&self, offer: &str) -> SdpResult<OfferAttributes> {
        if offer.trim().is_empty() {
            return Err(SdpError::EmptyOffer);
        }
        if !offer.trim_start().starts_with("v=") {
            return Err(SdpError::NotSdp {
                reason: "first line is not a v= line".to_string(),
            });
        }

        let mut attrs = OfferAttributes {
            line_ending: LineEnding::detect(offer),
            ..OfferAttributes::default()
        };

        // Later occurrences overwrite earlier ones.
        for line in offer.lines().map(strip_carriage_return) {
            if let Some(value) = line.strip_prefix(ICE_UFRAG_PREFIX) {
                attrs.ice_ufrag = non_empty(value);
            } else if let Some(value) = line.strip_prefix(ICE_PWD_PREFIX) {
                attrs.ice_pwd = non_empty(value);
            } else if let Some(value) = line.strip_prefix(FINGERPRINT_PREFIX) {
                attrs.fingerprint = non_empty(value);
            } else if let Some(value) = line.strip_prefix(MSID_PREFIX) {
                attrs.msid = value.split_whitespace().next().map(str::to_string);
            }
        }

        debug!(
            ice_ufrag = ?attrs.ice_ufrag,
            ice_pwd = ?attrs.ice_pwd,
            fingerprint = ?attrs.fingerprint.as_deref().map(truncate_fingerprint),
            msid = ?attrs.msid,
            line_ending = ?attrs.line_ending,
            "Extracted offer attributes"
        );

        let missing = attrs.missing();
        if !missing.is_empty() {
            warn!("SDP offer lacks attributes: {}", missing.join(", "));
        }

        Ok(attrs)
    }
}

fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Values are kept byte for byte; only a blank value counts as absent
fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn truncate_fingerprint(fingerprint: &str) -> &str {
    match fingerprint.char_indices().nth(20) {
        Some((idx, _)) => &fingerprint[..idx],
        None => fingerprint,
    }
}
