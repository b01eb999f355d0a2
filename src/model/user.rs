#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub uid: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_subscriber: bool,
    #[serde(default)]
    pub role: Option<String>,
}
