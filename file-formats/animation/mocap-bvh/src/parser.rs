//! Pipeline entry point tying the parsing and evaluation stages together

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::hierarchy::HierarchyParser;
use crate::motion::MotionParser;
use crate::pose::PoseCalculator;
use crate::rest_pose::RestPoseCalculator;
use crate::skeleton::Skeleton;
use crate::source::LineSource;

/// Reads a BVH file into a fully evaluated [`Skeleton`]
///
/// Stages run in a fixed order: hierarchy, rest pose, motion samples, then
/// per-frame poses. The first error aborts the whole parse.
///
/// ```no_run
/// use mocap_bvh::BvhParser;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let skeleton = BvhParser::new().parse_file("walk.bvh")?;
/// println!("{} joints, {} frames", skeleton.joint_count(), skeleton.frame_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct BvhParser {
    parallel: bool,
}

impl BvhParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate frames in parallel (requires the `parallel` feature)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse and evaluate a BVH document from a buffered reader
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Skeleton> {
        let mut source = LineSource::from_reader(reader);

        let mut skeleton = HierarchyParser::new().parse(&mut source)?;
        RestPoseCalculator::new().compute(&mut skeleton)?;
        MotionParser::new().parse(&mut skeleton, &mut source)?;
        PoseCalculator::new()
            .with_parallel(self.parallel)
            .compute(&mut skeleton)?;

        debug!("Parsed {skeleton}");
        Ok(skeleton)
    }

    /// Parse a BVH document held in memory
    pub fn parse_str(&self, text: &str) -> Result<Skeleton> {
        self.parse(Cursor::new(text))
    }

    /// Open and parse a BVH file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Skeleton> {
        let path = path.as_ref();
        debug!("Opening {}", path.display());
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }
}
