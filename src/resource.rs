use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::GrabError;

pub const ORG_URL: &str = "https://github.com/seas-cs32/";
pub const MAIN_ZIP_PATH: &str = "/archive/refs/heads/main.zip";
pub const SETUP_SENTINEL: &str = "cs32-setup";
pub const SETUP_REPO: &str = "template";

/// FILE_IDs of the pset zip files hosted in cs32-public. The FILE_ID of
/// a shareable Google Drive URL is the middle segment of
/// `https://drive.google.com/file/d/FILE_ID/view?usp=sharing`.
pub const PSETS: &[(&str, &str)] = &[
    ("pset1", "17jx0YjyoKPbaLsfaPsuFrKjpZm05tfDc"),
    ("pset2", "1RXwyEuSp-nomfzvtv28cSO9KQZZT8TCa"),
    ("pset3", "17SEp67vLgMytPuyuHNNnZxF5pPRYctVV"),
    ("pset4", "1-oOHOW9m7RGyuVUmRM-LyLrFnDUtZEEM"),
    ("pset5", "1jYYeNKa6fAdtnQ4kiIUSCj-j8U7SLSmP"),
];

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^chap(0[1-9]|10)$").unwrap());
static PSET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^pset[1-5]$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterName(String);

impl ChapterName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChapterName {
    type Err = GrabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !CHAPTER_RE.is_match(value) {
            return Err(GrabError::InvalidResource(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PsetName {
    name: String,
    file_id: &'static str,
}

impl PsetName {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Opaque Google Drive file id of the pset zip.
    pub fn file_id(&self) -> &'static str {
        self.file_id
    }
}

impl fmt::Display for PsetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for PsetName {
    type Err = GrabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !PSET_RE.is_match(value) {
            return Err(GrabError::InvalidResource(value.to_string()));
        }
        let file_id = PSETS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, id)| *id)
            .ok_or_else(|| GrabError::InvalidResource(value.to_string()))?;
        Ok(Self {
            name: value.to_string(),
            file_id,
        })
    }
}

/// A logical name for something `grab32` can fetch: a book chapter repo,
/// a pset zip, or the one-time codespace setup sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Setup,
    Chapter(ChapterName),
    Pset(PsetName),
}

impl Resource {
    /// Directory name the fetched files end up under. Setup fetches the
    /// fixed template repo.
    pub fn repo_name(&self) -> &str {
        match self {
            Resource::Setup => SETUP_REPO,
            Resource::Chapter(chapter) => chapter.as_str(),
            Resource::Pset(pset) => pset.as_str(),
        }
    }

    pub fn is_setup(&self) -> bool {
        matches!(self, Resource::Setup)
    }

    pub fn is_pset(&self) -> bool {
        matches!(self, Resource::Pset(_))
    }

    pub fn archive_url(&self) -> String {
        match self {
            Resource::Pset(pset) => format!(
                "https://drive.google.com/uc?export=download&id={}",
                pset.file_id()
            ),
            _ => format!("{ORG_URL}{}{MAIN_ZIP_PATH}", self.repo_name()),
        }
    }

    /// Name the downloaded archive is saved under. Repo archives keep the
    /// URL basename; pset downloads carry no usable basename so the pset
    /// name is used instead.
    pub fn archive_name(&self) -> String {
        match self {
            Resource::Pset(pset) => format!("{}.zip", pset.as_str()),
            _ => "main.zip".to_string(),
        }
    }
}

impl FromStr for Resource {
    type Err = GrabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == SETUP_SENTINEL {
            return Ok(Resource::Setup);
        }
        if value.starts_with("pset") {
            return Ok(Resource::Pset(value.parse()?));
        }
        Ok(Resource::Chapter(value.parse()?))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Setup => write!(f, "{SETUP_SENTINEL}"),
            Resource::Chapter(chapter) => write!(f, "{chapter}"),
            Resource::Pset(pset) => write!(f, "{pset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_chapter_valid() {
        for name in ["chap01", "chap04", "chap09", "chap10"] {
            let resource: Resource = name.parse().unwrap();
            assert_matches!(resource, Resource::Chapter(_));
            assert_eq!(resource.repo_name(), name);
        }
    }

    #[test]
    fn parse_chapter_invalid() {
        for name in ["chap00", "chap11", "chap4", "chapter04", "chap10x"] {
            let err = name.parse::<Resource>().unwrap_err();
            assert_matches!(err, GrabError::InvalidResource(_));
        }
    }

    #[test]
    fn parse_pset_valid() {
        let resource: Resource = "pset3".parse().unwrap();
        assert_matches!(&resource, Resource::Pset(pset) if pset.file_id() == "17SEp67vLgMytPuyuHNNnZxF5pPRYctVV");
    }

    #[test]
    fn parse_pset_invalid() {
        for name in ["pset0", "pset6", "pset12", "pset"] {
            let err = name.parse::<Resource>().unwrap_err();
            assert_matches!(err, GrabError::InvalidResource(_));
        }
    }

    #[test]
    fn parse_setup_sentinel() {
        let resource: Resource = "cs32-setup".parse().unwrap();
        assert_matches!(resource, Resource::Setup);
        assert_eq!(resource.repo_name(), "template");
    }

    #[test]
    fn parse_garbage() {
        let err = "homework7".parse::<Resource>().unwrap_err();
        assert_matches!(err, GrabError::InvalidResource(_));
    }

    #[test]
    fn repo_archive_url() {
        let resource: Resource = "chap04".parse().unwrap();
        assert_eq!(
            resource.archive_url(),
            "https://github.com/seas-cs32/chap04/archive/refs/heads/main.zip"
        );
        assert_eq!(resource.archive_name(), "main.zip");
    }

    #[test]
    fn pset_archive_url() {
        let resource: Resource = "pset1".parse().unwrap();
        assert_eq!(
            resource.archive_url(),
            "https://drive.google.com/uc?export=download&id=17jx0YjyoKPbaLsfaPsuFrKjpZm05tfDc"
        );
        assert_eq!(resource.archive_name(), "pset1.zip");
    }

    #[test]
    fn every_pset_has_a_file_id() {
        for n in 1..=5 {
            let resource: Resource = format!("pset{n}").parse().unwrap();
            assert_matches!(&resource, Resource::Pset(pset) if !pset.file_id().is_empty());
        }
    }
}
