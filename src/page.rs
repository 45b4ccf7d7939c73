//! The page the form was opened from

use url::Url;

const PROJECT_ID_PARAM: &str = "project_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageContext {
    url: Url,
}

impl PageContext {
    pub(crate) fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// First `project_id` query value, if present
    pub(crate) fn project_id(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == PROJECT_ID_PARAM)
            .map(|(_, value)| value.into_owned())
    }
}
