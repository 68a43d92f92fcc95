use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    Fragment,
    Request,
    SplitOperation,
}
impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fragment => write!(f, "Fragment"),
            Self::Request => write!(f, "Request"),
            Self::SplitOperation => write!(f, "SplitOperation"),
        }
    }
}
