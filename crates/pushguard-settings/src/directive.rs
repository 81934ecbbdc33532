/// Every directive line starts with a fixed-width prefix code.
pub const PREFIX_LEN: usize = 3;

pub const PREFIX_ALLOW: &str = "OKK";
pub const PREFIX_DENY: &str = "KOO";
pub const PREFIX_METADATA: &str = "MDT";
pub const COMMENT_PREFIXES: [&str; 3] = ["###", "///", "---"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    Allow,
    Deny,
    Metadata,
    Comment,
    Unrecognized(&'a str),
}

impl<'a> Directive<'a> {
    pub fn from_prefix(prefix: &'a str) -> Self {
        match prefix {
            PREFIX_ALLOW => Directive::Allow,
            PREFIX_DENY => Directive::Deny,
            PREFIX_METADATA => Directive::Metadata,
            p if COMMENT_PREFIXES.contains(&p) => Directive::Comment,
            other => Directive::Unrecognized(other),
        }
    }
}
