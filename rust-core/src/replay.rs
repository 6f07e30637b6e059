// Replay of a JSON-lines ledger against a genesis state. Each line is
// validated, then dispatched; outcomes are reported per line.

use crate::call::dispatch;
use crate::config::GenesisConfig;
use crate::error::RegistryError;
use crate::principal::BlockHeight;
use crate::state::RegistryState;
use crate::validation::{validate_call, SignedCall, ValidationContext, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;

/// One ledger line: `{"block_height": N, "call": SignedCall}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub block_height: BlockHeight,
    pub call: SignedCall,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Valid envelope, refused by the registry.
    Rejected(RegistryError),
    /// Never reached the registry.
    Invalid(ValidationError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineReport {
    pub line: usize,
    pub op: &'static str,
    pub outcome: Outcome,
}

impl fmt::Display for LineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t", self.line, self.op)?;
        match &self.outcome {
            Outcome::Applied => write!(f, "ok"),
            Outcome::Rejected(e) => write!(f, "err\t{}", e.code()),
            Outcome::Invalid(e) => write!(f, "invalid\t{e}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("read ledger: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: bad ledger entry: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Replayer {
    state: RegistryState,
    vctx: ValidationContext,
    applied: u64,
    rejected: u64,
}

impl Replayer {
    pub fn from_genesis(genesis: &GenesisConfig) -> Self {
        Replayer {
            state: RegistryState::from_genesis(genesis),
            vctx: ValidationContext::from_genesis(genesis),
            applied: 0,
            rejected: 0,
        }
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn apply(&mut self, entry: LedgerLine) -> Outcome {
        let ctx = match validate_call(&entry.call, entry.block_height, &mut self.vctx) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!(op = entry.call.call.op_name(), "invalid call: {e}");
                self.rejected += 1;
                return Outcome::Invalid(e);
            }
        };
        match dispatch(&mut self.state, &ctx, entry.call.call) {
            Ok(()) => {
                self.applied += 1;
                Outcome::Applied
            }
            Err(e) => {
                self.rejected += 1;
                Outcome::Rejected(e)
            }
        }
    }

    /// Apply every non-blank line of `reader`. Stops at the first line that
    /// is not a ledger entry; lines before it stay applied.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<Vec<LineReport>, ReplayError> {
        let mut reports = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let lineno = n + 1;
            let entry: LedgerLine = match serde_json::from_str(&line) {
                Ok(entry) => entry,
                Err(source) => {
                    return Err(ReplayError::Parse {
                        line: lineno,
                        source,
                    })
                }
            };
            let op = entry.call.call.op_name();
            let outcome = self.apply(entry);
            reports.push(LineReport {
                line: lineno,
                op,
                outcome,
            });
        }
        tracing::info!(
            applied = self.applied,
            rejected = self.rejected,
            journal_head = %hex::encode(self.state.journal().head()),
            "replay finished"
        );
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Call;
    use crate::validation::{principal_of, sign_call};

    const SECRET: [u8; 32] = [0x33; 32];

    fn genesis() -> GenesisConfig {
        GenesisConfig {
            chain_id: "carbon-replay".into(),
            admin: principal_of(&SECRET),
            start_height: 0,
        }
    }

    fn line(height: BlockHeight, nonce: u64, call: Call) -> String {
        let entry = LedgerLine {
            block_height: height,
            call: sign_call("carbon-replay", nonce, call, &SECRET),
        };
        serde_json::to_string(&entry).unwrap()
    }

    #[test]
    fn line_reports_render_as_tab_separated() {
        let ok = LineReport {
            line: 1,
            op: "verify_entity",
            outcome: Outcome::Applied,
        };
        let err = LineReport {
            line: 2,
            op: "verify_entity",
            outcome: Outcome::Rejected(RegistryError::NotFound),
        };
        let bad = LineReport {
            line: 3,
            op: "verify_entity",
            outcome: Outcome::Invalid(ValidationError::InvalidSignature),
        };
        assert_eq!(ok.to_string(), "1\tverify_entity\tok");
        assert_eq!(err.to_string(), "2\tverify_entity\terr\t404");
        assert_eq!(bad.to_string(), "3\tverify_entity\tinvalid\tinvalid signature");
    }

    #[test]
    fn malformed_line_stops_replay_with_its_number() {
        let verify = Call::VerifyEntity {
            entity_id: "entity1".into(),
        };
        let ledger = format!("{}\n\nnot json\n", line(1, 0, verify));
        let mut replayer = Replayer::from_genesis(&genesis());
        let err = replayer.replay(ledger.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Parse { line: 3, .. }));
        assert_eq!(replayer.rejected(), 1);
        assert_eq!(replayer.applied(), 0);
    }
}
