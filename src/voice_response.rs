//! TwiML rendering for webhook responses.
use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    TrimSilence,
    DoNotTrim,
}

impl Trim {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trim::TrimSilence => "trim-silence",
            Trim::DoNotTrim => "do-not-trim",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub action: String,
    pub max_length: u32,
    pub trim: Trim,
    pub finish_on_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub action: String,
    pub num_digits: u32,
    pub timeout: u32,
    /// Spoken while the platform waits for keypad input.
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(String),
    Pause(u32),
    Play(String),
    Record(Record),
    Gather(Gather),
    Redirect(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn pause(mut self, seconds: u32) -> Self {
        self.verbs.push(Verb::Pause(seconds));
        self
    }

    pub fn play(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Play(url.into()));
        self
    }

    pub fn record(mut self, record: Record) -> Self {
        self.verbs.push(Verb::Record(record));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Text of every `Say`, in order. Gather prompts are included.
    pub fn spoken(&self) -> Vec<&str> {
        self.verbs
            .iter()
            .filter_map(|verb| match verb {
                Verb::Say(text) => Some(text.as_str()),
                Verb::Gather(gather) => Some(gather.prompt.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.verbs.iter().rev().find_map(|verb| match verb {
            Verb::Redirect(url) => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            write_verb(&mut xml, verb);
        }
        xml.push_str("</Response>");
        xml
    }

    pub fn into_http_response(self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type("text/xml")
            .body(self.to_xml())
    }
}

impl Responder for VoiceResponse {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        self.into_http_response()
    }
}

// `write!` into a String cannot fail.
fn write_verb(xml: &mut String, verb: &Verb) {
    match verb {
        Verb::Say(text) => {
            let _ = write!(xml, "<Say>{}</Say>", escape(text));
        }
        Verb::Pause(length) => {
            let _ = write!(xml, r#"<Pause length="{}"/>"#, length);
        }
        Verb::Play(url) => {
            let _ = write!(xml, "<Play>{}</Play>", escape(url));
        }
        Verb::Record(record) => {
            let _ = write!(
                xml,
                r#"<Record action="{}" maxLength="{}" trim="{}""#,
                escape(&record.action),
                record.max_length,
                record.trim.as_str()
            );
            if let Some(key) = &record.finish_on_key {
                let _ = write!(xml, r#" finishOnKey="{}""#, escape(key));
            }
            xml.push_str("/>");
        }
        Verb::Gather(gather) => {
            let _ = write!(
                xml,
                r#"<Gather action="{}" numDigits="{}" timeout="{}"><Say>{}</Say></Gather>"#,
                escape(&gather.action),
                gather.num_digits,
                gather.timeout,
                escape(&gather.prompt)
            );
        }
        Verb::Redirect(url) => {
            let _ = write!(xml, r#"<Redirect method="POST">{}</Redirect>"#, escape(url));
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
