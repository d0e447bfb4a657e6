//! SDP answer synthesis
//!
//! Builds the single-audio-track answer the signaling platform expects.
//! Everything except the ICE credentials, the fingerprint and the stream id
//! is fixed, and the output must match the platform's parser line for line.
//!
//! # Answer Layout
//!
//! ```text
//! v=0                                   session
//! o=- 3965362799 3965362799 IN IP4 0.0.0.0
//! s=-
//! t=0 0
//! a=group:BUNDLE audio
//! a=msid-semantic: WMS <msid>           offer msid or fallback token
//! m=audio 9 UDP/TLS/RTP/SAVPF 111 126   audio section
//! ...
//! a=ice-ufrag:<ufrag>                   copied from the offer
//! a=ice-pwd:<pwd>                       copied from the offer
//! a=fingerprint:<fingerprint>           copied from the offer
//! a=setup:active                        fixed DTLS role
//! ...
//! ```

use std::fmt;

use tracing::debug;

use super::offer::{LineEnding, OfferAttributes};
use crate::error::{SdpError, SdpResult};

/// Stream id advertised when the offer carries no `a=msid`
pub const FALLBACK_MSID: &str = "aiortc-stream";

/// Static origin line; session id and version are fixed
pub const ORIGIN: &str = "o=- 3965362799 3965362799 IN IP4 0.0.0.0";

/// Opus payload type
pub const OPUS_PAYLOAD_TYPE: u8 = 111;

/// telephone-event payload type
pub const TELEPHONE_EVENT_PAYLOAD_TYPE: u8 = 126;

/// Synchronization source advertised for the answer's audio track
pub const AUDIO_SSRC: u32 = 2195401356;

/// CNAME bound to [`AUDIO_SSRC`]
pub const AUDIO_CNAME: &str = "AiortcAudioStream1";

const OPUS_FMTP: &str = "maxaveragebitrate=20000;maxplaybackrate=16000;minptime=20;sprop-maxcapturerate=16000;useinbandfec=1";

const PTIME_MS: u8 = 20;

/// DTLS role taken by the answerer (RFC 4145 `a=setup`)
///
/// The answerer always opens the DTLS handshake, whatever role the offer
/// declared.
pub const ANSWER_DTLS_SETUP: &str = "active";

/// Build the answer text for a parsed offer
///
/// Lines end with the convention the offer was written with.
///
/// # Errors
///
/// Returns `SdpError::MissingAttribute` when the offer lacked the ICE
/// username fragment, the ICE password or the fingerprint. No partial
/// answer is produced in that case.
pub fn synthesize_answer(attrs: &OfferAttributes) -> SdpResult<String> {
    let ice_ufrag = require(&attrs.ice_ufrag, "ice-ufrag")?;
    let ice_pwd = require(&attrs.ice_pwd, "ice-pwd")?;
    let fingerprint = require(&attrs.fingerprint, "fingerprint")?;
    let msid = attrs.msid.as_deref().unwrap_or(FALLBACK_MSID);

    let mut sdp = SdpWriter::new(attrs.line_ending);

    sdp.line("v=0");
    sdp.line(ORIGIN);
    sdp.line("s=-");
    sdp.line("t=0 0");
    sdp.line("a=group:BUNDLE audio");
    sdp.line(format_args!("a=msid-semantic: WMS {msid}"));

    sdp.line(format_args!(
        "m=audio 9 UDP/TLS/RTP/SAVPF {OPUS_PAYLOAD_TYPE} {TELEPHONE_EVENT_PAYLOAD_TYPE}"
    ));
    sdp.line("c=IN IP4 0.0.0.0");
    sdp.line("a=rtcp:9 IN IP4 0.0.0.0");
    sdp.line(format_args!("a=ice-ufrag:{ice_ufrag}"));
    sdp.line(format_args!("a=ice-pwd:{ice_pwd}"));
    sdp.line(format_args!("a=fingerprint:{fingerprint}"));
    sdp.line(format_args!("a=setup:{ANSWER_DTLS_SETUP}"));
    sdp.line("a=mid:audio");
    sdp.line("a=sendrecv");
    sdp.line("a=rtcp-mux");

    sdp.line(format_args!("a=rtpmap:{OPUS_PAYLOAD_TYPE} opus/48000/2"));
    sdp.line(format_args!("a=rtcp-fb:{OPUS_PAYLOAD_TYPE} transport-cc"));
    sdp.line(format_args!("a=fmtp:{OPUS_PAYLOAD_TYPE} {OPUS_FMTP}"));
    sdp.line(format_args!(
        "a=rtpmap:{TELEPHONE_EVENT_PAYLOAD_TYPE} telephone-event/8000"
    ));
    sdp.line(format_args!("a=maxptime:{PTIME_MS}"));
    sdp.line(format_args!("a=ptime:{PTIME_MS}"));
    sdp.line(format_args!("a=ssrc:{AUDIO_SSRC} cname:{AUDIO_CNAME}"));

    let answer = sdp.finish();
    debug!("Generated SDP answer ({} characters)", answer.len());
    Ok(answer)
}

fn require<'a>(value: &'a Option<String>, attribute: &'static str) -> SdpResult<&'a str> {
    value
        .as_deref()
        .ok_or(SdpError::MissingAttribute { attribute })
}

/// Accumulates lines terminated with one fixed line ending
struct SdpWriter {
    buf: String,
    ending: &'static str,
}

impl SdpWriter {
    fn new(ending: LineEnding) -> Self {
        Self {
            buf: String::with_capacity(1024),
            ending: ending.as_str(),
        }
    }

    fn line(&mut self, content: impl fmt::Display) {
        use fmt::Write;
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{content}{}", self.ending);
    }

    fn finish(self) -> String {
        self.buf
    }
}
