//! Constructors and conversions for the option types

use super::builder::{CleanOptionsBuilder, LinkifyOptionsBuilder};
use super::types::{CleanOptions, LinkifyOptions};
use crate::dom::ParseMode;
use crate::errors::SanitizeResult;
use crate::policy::Policy;

impl CleanOptions {
    #[must_use]
    pub fn builder() -> CleanOptionsBuilder {
        CleanOptionsBuilder::new()
    }

    /// Parse options from JSON; omitted fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidOptions`](crate::SanitizeError::InvalidOptions)
    /// for unknown fields or values of the wrong shape, and the usual
    /// allow-list validation errors.
    pub fn from_json(json: &str) -> SanitizeResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        Policy::resolve(&options)?;
        Ok(options)
    }

    /// Resolve into an immutable [`Policy`]
    ///
    /// # Errors
    ///
    /// See [`Policy::resolve`].
    pub fn policy(&self) -> SanitizeResult<Policy> {
        Policy::resolve(self)
    }
}

impl LinkifyOptions {
    #[must_use]
    pub fn builder() -> LinkifyOptionsBuilder {
        LinkifyOptionsBuilder::new()
    }

    /// Parse options from JSON; callbacks cannot be expressed and stay unset
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidOptions`](crate::SanitizeError::InvalidOptions)
    /// for unknown fields or values of the wrong shape.
    pub fn from_json(json: &str) -> SanitizeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn parse_mode(&self) -> ParseMode {
        ParseMode::from_fragment_flag(self.parse_as_fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SanitizeError;
    use crate::config::AllowedAttributes;

    #[test]
    fn test_clean_options_from_json() {
        let options = CleanOptions::from_json(
            r#"{"tags": ["span", "br"], "attributes": {"span": ["style"]}, "strip": true}"#,
        )
        .unwrap();
        assert_eq!(options.tags, ["span", "br"]);
        assert_eq!(
            options.attributes,
            AllowedAttributes::per_tag([("span", ["style"])])
        );
        assert!(options.strip);
        assert!(options.strip_comments);
    }

    #[test]
    fn test_flat_attribute_list_from_json() {
        let options = CleanOptions::from_json(r#"{"attributes": ["class"]}"#).unwrap();
        assert_eq!(options.attributes, AllowedAttributes::global(["class"]));
    }

    #[test]
    fn test_unrecognized_attribute_shape_rejected() {
        let err = CleanOptions::from_json(r#"{"attributes": "class"}"#).unwrap_err();
        assert!(matches!(err, SanitizeError::InvalidOptions(_)));

        let err = CleanOptions::from_json(r#"{"attributes": {"a": "href"}}"#).unwrap_err();
        assert!(matches!(err, SanitizeError::InvalidOptions(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CleanOptions::from_json(r#"{"tagz": []}"#).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_linkify_options_from_json() {
        let options = LinkifyOptions::from_json(r#"{"nofollow": false, "skip_pre": true}"#).unwrap();
        assert!(!options.nofollow);
        assert!(options.skip_pre);
        assert_eq!(options.parse_mode(), ParseMode::Fragment);
    }
}
