use std::fmt;

/// The media types a served archive entry can be labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Html,
    Css,
    JavaScript,
    Svg,
    Png,
    Jpeg,
    Json,
    OctetStream,
}

impl MediaType {
    /// Classifies an entry name by the text after its last `.` only.
    ///
    /// A name without any dot is compared as a whole.
    pub fn of(entry_name: &str) -> Self {
        let extension = entry_name
            .rsplit_once('.')
            .map_or(entry_name, |(_, ext)| ext);

        match extension {
            "html" => Self::Html,
            "css" => Self::Css,
            "js" => Self::JavaScript,
            "svg" => Self::Svg,
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "json" => Self::Json,
            _ => Self::OctetStream,
        }
    }

    pub fn essence(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Css => "text/css",
            Self::JavaScript => "text/javascript",
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Value for the `Content-Type` header.
    pub fn header_value(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Css => "text/css; charset=utf-8",
            Self::JavaScript => "text/javascript; charset=utf-8",
            other => other.essence(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.essence())
    }
}

pub fn media_type_of(entry_name: &str) -> MediaType {
    MediaType::of(entry_name)
}
