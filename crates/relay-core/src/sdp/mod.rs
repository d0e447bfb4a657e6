//! SDP offer/answer handling
//!
//! - [`offer`]: pulls the ICE credentials, fingerprint and stream id out of
//!   an offer
//! - [`answer`]: writes the fixed single-audio-track answer around them

pub mod answer;
pub mod offer;

pub use answer::{synthesize_answer, ANSWER_DTLS_SETUP, FALLBACK_MSID};
pub use offer::{LineEnding, OfferAttributes, OfferParser, PrefixScanParser};

use crate::error::SdpResult;

/// Parse `offer` with `parser` and synthesize the matching answer
pub fn answer_for_offer(parser: &dyn OfferParser, offer: &str) -> SdpResult<String> {
    let attrs = parser.parse(offer)?;
    synthesize_answer(&attrs)
}
