use std::fmt;
use std::str::FromStr;

use super::error::SegDatasetError;

/// Access pattern of a dataset: which transform path runs and what `get` returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Train,
    Val,
    Test,
    TestVal,
}

impl Mode {
    /// Subdirectory of `images/` and `annotations/` read in this mode.
    ///
    /// Only `Train` reads `training`. `Val`, `TestVal` and `Test` all read
    /// `validation`, matching the ADE20K challenge release which ships no
    /// separate test annotations.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Mode::Train => "training",
            Mode::Val | Mode::Test | Mode::TestVal => "validation",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Val => "val",
            Mode::Test => "test",
            Mode::TestVal => "testval",
        }
    }
}

impl FromStr for Mode {
    type Err = SegDatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Mode::Train),
            "val" => Ok(Mode::Val),
            "test" => Ok(Mode::Test),
            "testval" => Ok(Mode::TestVal),
            other => Err(SegDatasetError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_modes() {
        for mode in [Mode::Train, Mode::Val, Mode::Test, Mode::TestVal] {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "training".parse::<Mode>().unwrap_err();
        assert!(matches!(err, SegDatasetError::InvalidMode(ref m) if m == "training"));
        assert!("Train".parse::<Mode>().is_err());
    }

    #[test]
    fn only_train_reads_training_dir() {
        assert_eq!(Mode::Train.dir_name(), "training");
        assert_eq!(Mode::Val.dir_name(), "validation");
        assert_eq!(Mode::TestVal.dir_name(), "validation");
        assert_eq!(Mode::Test.dir_name(), "validation");
    }
}
