use crate::utils::{Result, SbieError};

/// Captured text of one launcher invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    pub stdout: String,
}

impl LaunchOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.stdout
    }

    /// Parses the output of a `/listpids` call. Each call starts a fresh pass
    /// over the same text.
    pub fn pids(&self) -> PidList {
        parse_pids(self.stdout.clone())
    }

    pub fn into_pids(self) -> PidList {
        parse_pids(self.stdout)
    }
}

/// Lazily parses whitespace-separated process ids.
pub fn parse_pids(text: impl Into<String>) -> PidList {
    PidList {
        text: text.into(),
        pos: 0,
        index: 0,
    }
}

/// One-shot iterator over the process ids printed by the launcher.
///
/// Yields an [`SbieError::OutputParse`] for the first token that is not a
/// non-negative integer and stops there.
#[derive(Debug, Clone)]
pub struct PidList {
    text: String,
    pos: usize,
    index: usize,
}

impl Iterator for PidList {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let start = rest.find(|c: char| !c.is_whitespace())?;
        let token_and_tail = &rest[start..];
        let len = token_and_tail
            .find(char::is_whitespace)
            .unwrap_or(token_and_tail.len());
        let token = &token_and_tail[..len];

        let index = self.index;
        self.index += 1;

        match token.parse::<u32>() {
            Ok(pid) => {
                self.pos += start + len;
                Some(Ok(pid))
            }
            Err(_) => {
                let err = SbieError::OutputParse {
                    token: token.to_string(),
                    index,
                };
                self.pos = self.text.len();
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for PidList {}
