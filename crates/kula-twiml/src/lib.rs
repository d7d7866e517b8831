//! Typed builder for Twilio voice response documents (TwiML).
//!
//! A response is an ordered list of verbs rendered as XML. Only the verbs
//! this service emits are modeled: Say, Gather, Play, Hangup.

/// Verbs a voice response can contain.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
    /// Speak `text` with the given provider voice.
    Say { voice: String, text: String },
    /// Collect spoken input and post the transcription to `action`.
    Gather {
        input: String,
        timeout_secs: u32,
        action: String,
    },
    /// Play audio fetched from a URL.
    Play { url: String },
    /// End the call.
    Hangup,
}

/// Options for a speech-gathering directive.
#[derive(Debug, Clone)]
pub struct GatherOptions {
    pub timeout_secs: u32,
    pub action: String,
}

/// An ordered TwiML `<Response>` document under construction.
#[derive(Debug, Clone, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, voice: &str, text: &str) -> &mut Self {
        self.verbs.push(Verb::Say {
            voice: voice.to_string(),
            text: text.to_string(),
        });
        self
    }

    /// Gather speech input; Twilio transcribes and posts to `action`.
    pub fn gather_speech(&mut self, options: GatherOptions) -> &mut Self {
        self.verbs.push(Verb::Gather {
            input: "speech".to_string(),
            timeout_secs: options.timeout_secs,
            action: options.action,
        });
        self
    }

    pub fn play(&mut self, url: &str) -> &mut Self {
        self.verbs.push(Verb::Play {
            url: url.to_string(),
        });
        self
    }

    pub fn hangup(&mut self) -> &mut Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// Render the document, XML declaration included.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say { voice, text } => {
                    out.push_str(&format!(
                        "<Say voice=\"{}\">{}</Say>",
                        escape_attr(voice),
                        escape_text(text)
                    ));
                }
                Verb::Gather {
                    input,
                    timeout_secs,
                    action,
                } => {
                    out.push_str(&format!(
                        "<Gather input=\"{}\" timeout=\"{}\" action=\"{}\"/>",
                        escape_attr(input),
                        timeout_secs,
                        escape_attr(action)
                    ));
                }
                Verb::Play { url } => {
                    out.push_str(&format!("<Play>{}</Play>", escape_text(url)));
                }
                Verb::Hangup => out.push_str("<Hangup/>"),
            }
        }
        out.push_str("</Response>");
        out
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        let vr = VoiceResponse::new();
        assert_eq!(
            vr.to_xml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>"
        );
    }

    #[test]
    fn test_say_then_gather() {
        let mut vr = VoiceResponse::new();
        vr.say("Polly.Salli", "Welcome to Kula.");
        vr.gather_speech(GatherOptions {
            timeout_secs: 3,
            action: "/handle-voice".into(),
        });

        let xml = vr.to_xml();
        assert!(xml.contains("<Say voice=\"Polly.Salli\">Welcome to Kula.</Say>"));
        assert!(xml.contains("<Gather input=\"speech\" timeout=\"3\" action=\"/handle-voice\"/>"));
        // Say comes before Gather
        assert!(xml.find("<Say").unwrap() < xml.find("<Gather").unwrap());
    }

    #[test]
    fn test_play_and_hangup() {
        let mut vr = VoiceResponse::new();
        vr.play("https://kula.example.com/reply_1.mp3");
        vr.hangup();

        let xml = vr.to_xml();
        assert!(xml.contains("<Play>https://kula.example.com/reply_1.mp3</Play>"));
        assert!(xml.ends_with("<Hangup/></Response>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut vr = VoiceResponse::new();
        vr.say("Polly.Salli", "Beans & <rice>");

        let xml = vr.to_xml();
        assert!(xml.contains("Beans &amp; &lt;rice&gt;"));
    }

    #[test]
    fn test_attr_is_escaped() {
        let mut vr = VoiceResponse::new();
        vr.gather_speech(GatherOptions {
            timeout_secs: 3,
            action: "/handle-voice?x=\"q\"".into(),
        });

        let xml = vr.to_xml();
        assert!(xml.contains("&quot;q&quot;"));
    }

    #[test]
    fn test_url_with_ampersand_is_escaped() {
        let mut vr = VoiceResponse::new();
        vr.play("https://kula.example.com/a.mp3?sig=1&t=2");
        assert!(vr.to_xml().contains("sig=1&amp;t=2"));
    }
}
