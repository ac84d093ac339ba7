/// Signing key
///
/// Never printed: the `Debug` output is masked.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Secret {
        Secret(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret: String = std::iter::repeat_n('X', self.0.len()).collect();

        f.debug_tuple("Secret").field(&secret).finish()
    }
}
