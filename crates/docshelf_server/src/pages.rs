use askama::Template;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything outside the RFC 3986 unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Absolute link to the index of one archive, each segment percent-encoded.
pub fn index_href(platform: &str, project: &str, version: &str) -> String {
    let mut href = String::new();
    for segment in [platform, project, version] {
        href.push('/');
        href.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    href.push('/');
    href
}

pub struct VersionLink {
    pub name: String,
    pub href: String,
}

pub struct ProjectListing {
    pub name: String,
    pub versions: Vec<VersionLink>,
}

pub struct PlatformListing {
    pub name: String,
    pub projects: Vec<ProjectListing>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub platforms: Vec<PlatformListing>,
}

#[derive(Template)]
#[template(path = "message.html")]
pub struct MessagePage<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
