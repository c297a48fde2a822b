use std::path::PathBuf;
use std::thread;

use crossbeam_channel::unbounded;
use schemport_core::ConvertConfig;
use serde::Serialize;

use crate::error::ConversionError;
use crate::grid;
use crate::pipeline::FilePipeline;
use crate::progress::ProgressDisplay;

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// What happened to one job.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Voxel count from the pre-scan (0 if the pre-scan failed).
    pub voxels: u64,
    /// Failure message, or None on success.
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file results of a batch, in job order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total_voxels: u64,
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Runs one conversion worker per job, in parallel, and feeds their
/// combined progress into a display.
#[derive(Debug, Clone, Default)]
pub struct BatchCoordinator {
    pipeline: FilePipeline,
}

impl BatchCoordinator {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            pipeline: FilePipeline::new(config),
        }
    }

    /// Convert every job exactly once.
    ///
    /// Each source is loaded once up front to size the display. Workers are
    /// independent threads sharing only the progress channel; a failing or
    /// panicking worker is recorded in its outcome and never affects the
    /// others. Returns after every worker has terminated.
    pub fn run<D: ProgressDisplay + ?Sized>(
        &self,
        jobs: &[ConversionJob],
        display: &mut D,
    ) -> BatchSummary {
        let voxels: Vec<u64> = jobs
            .iter()
            .map(|job| match grid::scan_voxel_count(&job.source) {
                Ok(count) => count,
                Err(e) => {
                    log::warn!("could not pre-scan {}: {e}", job.source.display());
                    0
                }
            })
            .collect();
        let total_voxels: u64 = voxels.iter().sum();
        display.set_total(total_voxels);
        log::info!("converting {} files ({total_voxels} blocks)", jobs.len());

        let (tx, rx) = unbounded::<u64>();
        let pipeline = &self.pipeline;

        let results: Vec<Result<(), ConversionError>> = thread::scope(|s| {
            let handles: Vec<_> = jobs
                .iter()
                .enumerate()
                .map(|(n, job)| {
                    let tx = tx.clone();
                    thread::Builder::new()
                        .name(format!("convert-{n}"))
                        .spawn_scoped(s, move || pipeline.convert(&job.source, &job.dest, &tx))
                })
                .collect();

            // Workers own the only senders left; the channel disconnects once
            // the last one exits, after every queued tick has been received.
            drop(tx);
            for delta in rx.iter() {
                let queued: u64 = rx.try_iter().sum();
                display.advance(delta + queued);
            }

            handles
                .into_iter()
                .zip(jobs)
                .map(|(handle, job)| match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        let err = ConversionError::WorkerPanicked {
                            path: job.source.clone(),
                        };
                        log::error!("{err}");
                        Err(err)
                    }),
                    Err(source) => {
                        let err = ConversionError::WorkerSpawn {
                            path: job.source.clone(),
                            source,
                        };
                        log::error!("{err}");
                        Err(err)
                    }
                })
                .collect()
        });

        display.finish();

        let files: Vec<FileOutcome> = jobs
            .iter()
            .zip(voxels)
            .zip(results)
            .map(|((job, voxels), result)| FileOutcome {
                source: job.source.clone(),
                dest: job.dest.clone(),
                voxels,
                error: result.err().map(|e| e.to_string()),
            })
            .collect();

        let summary = BatchSummary {
            total_voxels,
            files,
        };
        log::info!(
            "{} converted, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use schemport_core::constants::SOURCE_ROOT_NAME;

    use super::*;
    use crate::grid::tests::schematic_root;
    use crate::progress::NullDisplay;

    #[derive(Default)]
    struct RecordingDisplay {
        total: Option<u64>,
        advanced: u64,
        finished: bool,
    }

    impl ProgressDisplay for RecordingDisplay {
        fn set_total(&mut self, total: u64) {
            self.total = Some(total);
        }

        fn advance(&mut self, delta: u64) {
            assert!(!self.finished, "advance after finish");
            self.advanced += delta;
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    fn write_source(path: &Path, dims: (i16, i16, i16)) {
        let count = (dims.0 as usize) * (dims.1 as usize) * (dims.2 as usize);
        let root = schematic_root(dims, vec![1; count], Vec::new());
        schemport_nbt::write_gzip_file(path, SOURCE_ROOT_NAME, &root, 6).expect("write source");
    }

    #[test]
    fn test_batch_converts_every_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sizes = [(2, 2, 2), (3, 1, 4), (1, 5, 1), (4, 4, 4)];
        let jobs: Vec<ConversionJob> = sizes
            .iter()
            .enumerate()
            .map(|(i, &dims)| {
                let source = dir.path().join(format!("s{i}.schematic"));
                write_source(&source, dims);
                ConversionJob::new(source, dir.path().join(format!("s{i}.nbt")))
            })
            .collect();

        let mut display = RecordingDisplay::default();
        let summary = BatchCoordinator::default().run(&jobs, &mut display);

        assert_eq!(summary.total_voxels, 8 + 12 + 5 + 64);
        assert_eq!(display.total, Some(89));
        assert_eq!(display.advanced, 89, "no trailing ticks may be lost");
        assert!(display.finished);
        assert!(summary.all_succeeded());
        for (job, outcome) in jobs.iter().zip(&summary.files) {
            assert_eq!(outcome.source, job.source);
            assert!(job.dest.exists());
        }
    }

    #[test]
    fn test_one_bad_file_does_not_affect_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good_a = dir.path().join("a.schematic");
        let good_b = dir.path().join("b.schematic");
        let bad = dir.path().join("broken.schematic");
        write_source(&good_a, (2, 3, 2));
        write_source(&good_b, (1, 1, 7));
        std::fs::write(&bad, b"definitely not a tag document").expect("write bad");

        let jobs = vec![
            ConversionJob::new(&good_a, dir.path().join("a.nbt")),
            ConversionJob::new(&bad, dir.path().join("broken.nbt")),
            ConversionJob::new(&good_b, dir.path().join("b.nbt")),
        ];
        let mut display = RecordingDisplay::default();
        let summary = BatchCoordinator::default().run(&jobs, &mut display);

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(summary.files[1].error.is_some());
        assert_eq!(summary.files[1].voxels, 0);
        assert!(dir.path().join("a.nbt").exists());
        assert!(dir.path().join("b.nbt").exists());
        assert!(!dir.path().join("broken.nbt").exists());
        assert_eq!(display.advanced, 12 + 7);
        assert_eq!(display.total, Some(19));
    }

    #[test]
    fn test_shared_dest_does_not_fail_either_job() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("house.schem");
        let second = dir.path().join("house.schematic");
        write_source(&first, (20, 20, 20));
        write_source(&second, (20, 20, 20));
        let dest = dir.path().join("house.nbt");

        let jobs = vec![
            ConversionJob::new(&first, &dest),
            ConversionJob::new(&second, &dest),
        ];
        let summary = BatchCoordinator::default().run(&jobs, &mut NullDisplay);

        assert!(summary.all_succeeded(), "errors: {:?}", summary.files);
        assert!(schemport_nbt::read_file(&dest).is_ok());
    }

    #[test]
    fn test_empty_batch() {
        let mut display = RecordingDisplay::default();
        let summary = BatchCoordinator::default().run(&[], &mut display);
        assert!(summary.files.is_empty());
        assert_eq!(display.total, Some(0));
        assert!(display.finished);
    }

    #[test]
    fn test_summary_serializes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("x.schematic");
        write_source(&source, (1, 1, 1));
        let jobs = vec![ConversionJob::new(&source, dir.path().join("x.nbt"))];
        let summary = BatchCoordinator::default().run(&jobs, &mut NullDisplay);
        let json = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(json["total_voxels"], 1);
        assert!(json["files"][0]["error"].is_null());
    }
}
