//! Per-episode anchor collection and preservation.

use regex::Regex;
use reelsmith_core::{Anchor, AnchorKind, Clip, VisualDescription};
use std::sync::LazyLock;

static CHINESE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:在|于|到|进入|走进|来到|回到|离开|站在|坐在)(\p{Han}{1,6}?(?:宫|殿|府|院|楼|厅|室|街|巷|城|村|寺|庙|店|馆|园|场|台|桥|湖|屋|房|阁|堂|庄|公司|学校|医院))",
    )
    .expect("Valid location regex")
});

static ENGLISH_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:in|at|inside|outside|into|onto)\s+(?:the\s+)?([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*){0,3})")
        .expect("Valid location regex")
});

static SCENE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:INT|EXT)\.\s*([^\n-]+?)\s*(?:-|$)").expect("Valid scene heading regex")
});

/// Location names mentioned in a visual description.
pub fn locations_in(visual: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for regex in [&*SCENE_HEADING, &*CHINESE_LOCATION, &*ENGLISH_LOCATION] {
        for captures in regex.captures_iter(visual) {
            let name = captures[1].trim().to_string();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Whether `text` names `name`.
///
/// Where the name starts or ends with a Latin letter or digit, the match must
/// not run into a neighbouring letter or digit, so "Lin" is not found in
/// "Linda". Han names match as substrings.
pub fn mentions(text: &str, name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    let word_edge = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    let starts_word = word_edge(name.chars().next());
    let ends_word = word_edge(name.chars().next_back());
    text.match_indices(name).any(|(i, _)| {
        let before = text[..i].chars().next_back();
        let after = text[i + name.len()..].chars().next();
        !(starts_word && word_edge(before)) && !(ends_word && word_edge(after))
    })
}

/// Anchors collected once per episode, before any description is produced.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Clip, Dialogue, VisualDescription};
/// use reelsmith_storyboard::AnchorRegistry;
///
/// let clip = Clip::new("C01", "Lin waits in the Old Temple", "calm")
///     .with_dialogue(Some(Dialogue::Text("Lin：到了".to_string())));
/// let registry = AnchorRegistry::collect(std::slice::from_ref(&clip), &[]);
/// assert_eq!(registry.len(), 2);
///
/// let mut description = VisualDescription {
///     subject: "a young woman".to_string(),
///     ..Default::default()
/// };
/// registry.preserve(&clip, &mut description);
/// assert_eq!(description.subject, "{@char_Lin} a young woman");
/// assert_eq!(description.environment, "{@loc_Old_Temple}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorRegistry {
    anchors: Vec<Anchor>,
}

impl AnchorRegistry {
    /// Collect speakers, known characters named in visuals, and locations.
    #[tracing::instrument(skip_all, fields(clips = clips.len()))]
    pub fn collect(clips: &[Clip], known_characters: &[String]) -> Self {
        let mut registry = Self::default();
        for clip in clips {
            for speaker in clip.speakers() {
                registry.add(AnchorKind::Char, &speaker);
            }
            for name in known_characters {
                if mentions(&clip.visual, name) {
                    registry.add(AnchorKind::Char, name);
                }
            }
            for location in locations_in(&clip.visual) {
                registry.add(AnchorKind::Loc, &location);
            }
        }
        tracing::debug!(anchors = registry.anchors.len(), "Anchors collected");
        registry
    }

    fn add(&mut self, kind: AnchorKind, name: &str) {
        let anchor = Anchor::new(kind, name);
        if anchor.name().is_empty() {
            return;
        }
        let known = self
            .anchors
            .iter()
            .any(|a| a.kind() == anchor.kind() && a.name() == anchor.name());
        if !known {
            self.anchors.push(anchor);
        }
    }

    /// All anchors in collection order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no anchors were found.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Anchor of the given kind and name.
    pub fn get(&self, kind: AnchorKind, name: &str) -> Option<&Anchor> {
        let name = name.trim();
        self.anchors
            .iter()
            .find(|a| *a.kind() == kind && a.name() == name)
    }

    /// Anchors a clip refers to: its speakers, characters named in its
    /// visual, and locations named in its visual.
    pub fn relevant_for(&self, clip: &Clip) -> Vec<&Anchor> {
        let speakers = clip.speakers();
        self.anchors
            .iter()
            .filter(|anchor| match anchor.kind() {
                AnchorKind::Char => {
                    speakers.iter().any(|s| s.trim() == anchor.name())
                        || mentions(&clip.visual, anchor.name())
                }
                AnchorKind::Loc | AnchorKind::Prop => mentions(&clip.visual, anchor.name()),
            })
            .collect()
    }

    /// Prepend every relevant token the description lacks.
    ///
    /// Character tokens go in front of the subject, location and prop tokens
    /// in front of the environment.
    pub fn preserve(&self, clip: &Clip, description: &mut VisualDescription) {
        let mut subject_tokens: Vec<&str> = Vec::new();
        let mut environment_tokens: Vec<&str> = Vec::new();
        for anchor in self.relevant_for(clip) {
            let token = anchor.token().as_str();
            match anchor.kind() {
                AnchorKind::Char if !description.subject.contains(token) => {
                    subject_tokens.push(token)
                }
                AnchorKind::Loc | AnchorKind::Prop if !description.environment.contains(token) => {
                    environment_tokens.push(token)
                }
                _ => {}
            }
        }
        prepend(&mut description.subject, &subject_tokens);
        prepend(&mut description.environment, &environment_tokens);
    }
}

fn prepend(field: &mut String, tokens: &[&str]) {
    if tokens.is_empty() {
        return;
    }
    let prefix = tokens.join(" ");
    *field = if field.trim().is_empty() {
        prefix
    } else {
        format!("{} {}", prefix, field.trim())
    };
}
