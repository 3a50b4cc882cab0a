//! Batch conversion orchestration

use super::config::ConvertConfig;
use super::discovery::{find_candidates, Candidate, PlaylistPaths};
use super::{json, xml};
use crate::error::{ConvertError, Result};
use crate::rekordbox;
use std::fmt;
use std::path::PathBuf;

/// Output format of one generate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Xml => write!(f, "XML"),
        }
    }
}

/// What happened to one (playlist, format) pair
#[derive(Debug)]
pub enum OutcomeStatus {
    Written(PathBuf),
    /// XML requested but no metadata export was found
    Skipped,
    Failed(ConvertError),
}

#[derive(Debug)]
pub struct Outcome {
    pub playlist: String,
    pub format: OutputFormat,
    pub status: OutcomeStatus,
}

/// Result of a whole run, one outcome per attempted output
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn written(&self) -> impl Iterator<Item = (&Outcome, &PathBuf)> {
        self.outcomes.iter().filter_map(|o| match o.status {
            OutcomeStatus::Written(ref path) => Some((o, path)),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Outcome, &ConvertError)> {
        self.outcomes.iter().filter_map(|o| match o.status {
            OutcomeStatus::Failed(ref err) => Some((o, err)),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn written_count(&self) -> usize {
        self.written().count()
    }
}

/// Main conversion pipeline
pub struct ConvertPipeline {
    config: ConvertConfig,
}

impl ConvertPipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Convert every candidate playlist
    ///
    /// Only a source directory that cannot be listed or a destination
    /// that cannot be created fails the run. Individual conversion
    /// failures are logged and collected in the report.
    pub fn run(&self) -> Result<BatchReport> {
        log::info!(
            "Converting playlists from {:?} into {:?}",
            self.config.source_dir,
            self.config.dest_dir
        );

        let candidates = find_candidates(&self.config)?;
        let mut report = BatchReport::default();

        if candidates.is_empty() {
            log::info!("No playlists found");
            return Ok(report);
        }

        std::fs::create_dir_all(&self.config.dest_dir)
            .map_err(|e| ConvertError::output(&self.config.dest_dir, e))?;

        for (i, candidate) in candidates.iter().enumerate() {
            log::info!(
                "[{}/{}] Processing: {}",
                i + 1,
                candidates.len(),
                candidate.prefix
            );

            if self.config.json {
                let status = self.generate_json(candidate).into();
                report.push(candidate, OutputFormat::Json, status);
            }

            if self.config.xml {
                let status = if candidate.xml_eligible {
                    self.generate_xml(candidate).into()
                } else {
                    log::warn!(
                        "Skipping XML for '{}': no {}.txt alongside it",
                        candidate.prefix,
                        candidate.prefix
                    );
                    OutcomeStatus::Skipped
                };
                report.push(candidate, OutputFormat::Xml, status);
            }
        }

        log::info!(
            "Conversion finished: {} written, {} failed, {} skipped",
            report.written_count(),
            report.failed_count(),
            report.skipped_count()
        );

        Ok(report)
    }

    /// Convert one playlist to Rekordbox XML
    pub fn generate_xml(&self, candidate: &Candidate) -> Result<PathBuf> {
        let paths = self.paths(candidate);
        let tracks = rekordbox::load_playlist(&paths.m3u8, Some(&paths.txt))?;
        xml::write_xml(&tracks, &candidate.prefix, &paths.xml)?;
        Ok(paths.xml)
    }

    /// Convert one playlist to Tribe XR JSON
    pub fn generate_json(&self, candidate: &Candidate) -> Result<PathBuf> {
        let paths = self.paths(candidate);
        let tracks = rekordbox::load_playlist(&paths.m3u8, None)?;
        json::write_json(&tracks, &candidate.prefix, &paths.json)?;
        Ok(paths.json)
    }

    fn paths(&self, candidate: &Candidate) -> PlaylistPaths {
        PlaylistPaths::new(
            &self.config.source_dir,
            &self.config.dest_dir,
            &candidate.prefix,
        )
    }
}

impl BatchReport {
    fn push(&mut self, candidate: &Candidate, format: OutputFormat, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Written(ref path) => log::info!("Created {}", path.display()),
            OutcomeStatus::Failed(ref err) => log::error!(
                "Unable to construct {} playlist '{}': {}",
                format,
                candidate.prefix,
                err
            ),
            OutcomeStatus::Skipped => {}
        }

        self.outcomes.push(Outcome {
            playlist: candidate.prefix.clone(),
            format,
            status,
        });
    }
}

impl From<Result<PathBuf>> for OutcomeStatus {
    fn from(result: Result<PathBuf>) -> Self {
        match result {
            Ok(path) => OutcomeStatus::Written(path),
            Err(err) => OutcomeStatus::Failed(err),
        }
    }
}
