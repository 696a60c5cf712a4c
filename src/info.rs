use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};
use serde::{Deserialize, Serialize};

/// General document metadata such as title, author, etc
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// The title of the document.
    #[serde(default)]
    pub title: Option<String>,
    /// The author(s) of the document. No prescribed format.
    #[serde(default)]
    pub author: Option<String>,
    /// The subject of the document.
    #[serde(default)]
    pub subject: Option<String>,
    /// Keywords for the document, usually the OCR languages as a comma separated list
    #[serde(default)]
    pub keywords: Option<String>,
    /// When the OCR request was made. Supplied by the caller so that identical
    /// input always produces identical bytes
    #[serde(default)]
    pub creation_date: Option<DateTime<FixedOffset>>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Set the title of the info block, modifying `self`
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the author of the info block, modifying `self`
    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    /// Set the subject of the info block, modifying `self`
    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the keywords from the languages the OCR engine was asked to recognise
    pub fn languages<S: AsRef<str>>(&mut self, languages: &[S]) -> &mut Self {
        let keywords: Vec<&str> = languages.iter().map(AsRef::as_ref).collect();
        self.keywords = Some(keywords.join(", "));
        self
    }

    /// Set the creation date of the info block, modifying `self`
    pub fn creation_date(&mut self, date: DateTime<FixedOffset>) -> &mut Self {
        self.creation_date = Some(date);
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        if let Some(keywords) = &self.keywords {
            info.keywords(TextStr(keywords.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.producer(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        if let Some(date) = &self.creation_date {
            let offset_seconds = date.offset().local_minus_utc();
            let offset_hours = offset_seconds / (60 * 60);
            let offset_minutes = ((offset_seconds - (offset_hours * (60 * 60))) / 60).abs();
            let date = PDate::new(date.year() as u16)
                .month(date.month() as u8)
                .day(date.day() as u8)
                .hour(date.hour() as u8)
                .minute(date.minute() as u8)
                .second(date.second() as u8)
                .utc_offset_hour(offset_hours as i8)
                .utc_offset_minute(offset_minutes as u8);
            info.creation_date(date);
        }
    }
}
