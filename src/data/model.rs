use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Profile – one named numeric sequence
// ---------------------------------------------------------------------------

/// A named waveform: raw-then-averaged samples of one dump file, or one
/// literal reference array. Normalisation keeps the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub values: Vec<f64>,
}

impl Profile {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ProfileSet – an ordered collection of profiles
// ---------------------------------------------------------------------------

/// Ordered profiles. Iteration order is the pairing order used by every
/// comparator, so sources must build it deterministically (dumps are sorted
/// by file name, reference arrays keep their declaration order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSet {
    pub profiles: Vec<Profile>,
}

impl ProfileSet {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Anonymous profiles named `<prefix>_<index>`.
    pub fn from_arrays(prefix: &str, arrays: Vec<Vec<f64>>) -> Self {
        Self::new(
            arrays
                .into_iter()
                .enumerate()
                .map(|(i, values)| Profile::new(format!("{prefix}_{i}"), values))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

// ---------------------------------------------------------------------------
// Ingest bookkeeping
// ---------------------------------------------------------------------------

/// Integer samples read from one instrument dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSamples {
    pub name: String,
    pub samples: Vec<u32>,
}

/// Per-file accepted/rejected line counts. Rejected lines never abort a
/// run, this is the only place they surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub name: String,
    pub accepted: usize,
    pub rejected: usize,
    pub inverted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files: Vec<FileReport>,
}

impl IngestReport {
    pub fn total_accepted(&self) -> usize {
        self.files.iter().map(|f| f.accepted).sum()
    }

    pub fn total_rejected(&self) -> usize {
        self.files.iter().map(|f| f.rejected).sum()
    }
}

// ---------------------------------------------------------------------------
// ResultValue – one line of a result file
// ---------------------------------------------------------------------------

/// A single comparator output, rendered as one line.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Scalar(f64),
    /// Statistic / p-value style pair, rendered `(a, b)`.
    Pair(f64, f64),
    /// Rendered `[a, b, ...]`, same as the sanitised file format.
    Sequence(Vec<f64>),
    Label(usize),
}

impl ResultValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ResultValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Scalar(v) => write!(f, "{}", FloatRepr(*v)),
            ResultValue::Pair(a, b) => write!(f, "({}, {})", FloatRepr(*a), FloatRepr(*b)),
            ResultValue::Sequence(values) => write!(f, "{}", SequenceRepr(values)),
            ResultValue::Label(l) => write!(f, "{l}"),
        }
    }
}

/// Canonical float text: shortest round-trip digits, always with a decimal
/// point (`4.0`, not `4`), `nan` / `inf` / `-inf` for non-finite values.
pub struct FloatRepr(pub f64);

impl fmt::Display for FloatRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return write!(f, "nan");
        }
        if v.is_infinite() {
            return write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" });
        }
        let text = v.to_string();
        if text.contains('.') {
            write!(f, "{text}")
        } else {
            write!(f, "{text}.0")
        }
    }
}

/// `[a, b, c]` with canonical floats.
pub struct SequenceRepr<'a>(pub &'a [f64]);

impl fmt::Display for SequenceRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", FloatRepr(*v))?;
        }
        write!(f, "]")
    }
}
