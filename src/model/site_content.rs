use super::error::ContentError;

/// Editable HTML pages shown inside the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    PrivacyPolicy,
    Terms,
    About,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::PrivacyPolicy => "privacyPolicy",
            PageType::Terms => "terms",
            PageType::About => "about",
        }
    }

    pub fn default_content(&self) -> &'static str {
        match self {
            PageType::PrivacyPolicy => {
                "<h1>Privacy Policy</h1><p>Edit your privacy policy here...</p>"
            }
            PageType::Terms => "<h1>Terms of Service</h1><p>Edit your terms of service here...</p>",
            PageType::About => "<h1>About Us</h1><p>Edit your about page content here...</p>",
        }
    }
}

impl TryFrom<&str> for PageType {
    type Error = ContentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "privacyPolicy" => Ok(PageType::PrivacyPolicy),
            "terms" => Ok(PageType::Terms),
            "about" => Ok(PageType::About),
            other => Err(ContentError::UnknownPage(other.to_string())),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteContent {
    pub content: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SocialAccounts {
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub tiktok: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
}
