//! URL rewriting for media server URIs and persistent identifiers

/// Internal scheme prefix used by the catalog for media server objects
const MEDIA_SERVER_PREFIX: &str = "mediaserver:hsm/";

/// Public host serving media server objects
const MEDIA_SERVER_HOST: &str = "https://ba14ns21403-sec1.fhnw.ch/mediasrv/hsm/";

/// Suffix selecting the master rendition of a media object
const MASTER_SUFFIX: &str = "/master";

const ARK_RESOLVER: &str = "https://n2t.net/";
const HANDLE_RESOLVER: &str = "https://hdl.handle.net/";

/// Persistent identifier kinds carried over into items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Ark,
    Handle,
}

impl IdentifierKind {
    /// Kind for an extra-metadata key; `None` for keys outside the allow-list
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ark" => Some(IdentifierKind::Ark),
            "handle" => Some(IdentifierKind::Handle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::Ark => "ark",
            IdentifierKind::Handle => "handle",
        }
    }

    /// Resolvable URL for an identifier value
    ///
    /// `ark:/15737/p658-sjm6-66z4` → `https://n2t.net/ark:/15737/p658-sjm6-66z4`,
    /// `20.500.11806/med/3jzx-tf3s-g1` → `https://hdl.handle.net/20.500.11806/med/3jzx-tf3s-g1`
    pub fn resolve(self, value: &str) -> String {
        match self {
            IdentifierKind::Ark => format!("{}{}", ARK_RESOLVER, value),
            IdentifierKind::Handle => format!("{}{}", HANDLE_RESOLVER, value),
        }
    }
}

/// Rewrite a media server URI into an HTTPS URL of its master rendition
///
/// Replaces the first `mediaserver:hsm/` prefix with the media host and appends
/// `/master`. Empty in, empty out.
pub fn media_server_url(uri: &str) -> String {
    if uri.is_empty() {
        return String::new();
    }
    format!(
        "{}{}",
        uri.replacen(MEDIA_SERVER_PREFIX, MEDIA_SERVER_HOST, 1),
        MASTER_SUFFIX
    )
}
