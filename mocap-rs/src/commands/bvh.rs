//! BVH motion-capture command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use mocap_bvh::{BvhParser, JointId, Skeleton, validate_skeleton};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, format_bytes, format_duration,
    format_quat, format_vec3, render_tree,
};

#[derive(Subcommand)]
pub enum BvhCommands {
    /// Display information about a BVH file
    Info {
        /// Path to the BVH file
        file: PathBuf,

        /// List every joint with its offset and channels
        #[arg(long)]
        joints: bool,
    },

    /// Validate one or more BVH files
    Validate {
        /// Paths to the BVH files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the joint hierarchy of a BVH file
    Tree {
        /// Path to the BVH file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show compact metadata inline
        #[arg(long)]
        compact: bool,
    },

    /// Print the evaluated pose of one frame
    Pose {
        /// Path to the BVH file
        file: PathBuf,

        /// Frame index (0-based)
        #[arg(short, long, default_value_t = 0)]
        frame: usize,

        /// Only show this joint
        #[arg(short, long)]
        joint: Option<String>,
    },

    /// Export the parsed skeleton and animation
    #[cfg(feature = "serde")]
    Export {
        /// Path to the input BVH file
        input: PathBuf,

        /// Path to write the exported document
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}

/// Encodings supported by `bvh export`
#[cfg(feature = "serde")]
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

pub fn execute(command: BvhCommands) -> Result<()> {
    match command {
        BvhCommands::Info { file, joints } => execute_info(&file, joints),
        BvhCommands::Validate { files } => execute_validate(&files),
        BvhCommands::Tree {
            file,
            depth,
            no_color,
            compact,
        } => execute_tree(&file, depth, no_color, compact),
        BvhCommands::Pose { file, frame, joint } => execute_pose(&file, frame, joint.as_deref()),
        #[cfg(feature = "serde")]
        BvhCommands::Export {
            input,
            output,
            format,
        } => execute_export(&input, &output, format),
    }
}

fn load(path: &Path) -> Result<Skeleton> {
    BvhParser::new()
        .with_parallel(cfg!(feature = "parallel"))
        .parse_file(path)
        .with_context(|| format!("Failed to parse BVH file: {}", path.display()))
}

fn execute_info(path: &Path, list_joints: bool) -> Result<()> {
    use console::style;

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    let skeleton = load(path)?;

    println!("\n{}", style("BVH File Information").bold().underlined());
    println!("File: {}", style(path.display()).cyan());
    println!("Size: {}", format_bytes(metadata.len()));
    println!("Frames: {}", style(skeleton.frame_count()).green());
    println!(
        "Frame Time: {:.6}s ({:.2} fps)",
        skeleton.frame_time(),
        skeleton.frame_rate()
    );
    println!("Duration: {}", format_duration(skeleton.duration()));
    println!(
        "Rotation Order: {}",
        style(skeleton.rotation_order()).yellow()
    );
    println!("Channels: {}", style(skeleton.channel_count()).green());
    println!("Joints: {}", style(skeleton.joint_count()).green());
    println!(
        "End Sites: {}",
        style(skeleton.end_site_ids().len()).green()
    );

    if list_joints {
        println!("\n{}", style("Joints").bold());
        let mut table = create_table(vec!["Joint", "Parent", "Depth", "Offset", "Channels"]);
        for joint in skeleton.joints() {
            let parent = joint
                .parent()
                .map_or("-", |parent| skeleton[parent].name());
            let channels: Vec<&str> = joint.channels().iter().map(|c| c.as_str()).collect();
            add_table_row(
                &mut table,
                vec![
                    joint.name().to_string(),
                    parent.to_string(),
                    joint.depth().to_string(),
                    format_vec3(joint.rest_pose().offset),
                    channels.join(" "),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}

fn execute_validate(paths: &[PathBuf]) -> Result<()> {
    use console::style;

    let mut failures = 0;
    for path in paths {
        let result = load(path).and_then(|skeleton| {
            validate_skeleton(&skeleton)
                .with_context(|| format!("Invalid skeleton: {}", path.display()))?;
            Ok(skeleton)
        });

        match result {
            Ok(skeleton) => println!(
                "{} {} ({} joints, {} frames)",
                style("✓").green(),
                style(path.display()).cyan(),
                skeleton.joint_count(),
                skeleton.frame_count()
            ),
            Err(err) => {
                failures += 1;
                println!(
                    "{} {}: {:#}",
                    style("✗").red(),
                    style(path.display()).cyan(),
                    err
                );
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed validation", failures, paths.len());
    }
    Ok(())
}

fn execute_tree(path: &Path, depth: Option<usize>, no_color: bool, compact: bool) -> Result<()> {
    let skeleton = load(path)?;
    let size = std::fs::metadata(path).map(|m| m.len()).ok();

    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string());
    let mut root = TreeNode::new(file_name, NodeType::File)
        .with_metadata("frames", &skeleton.frame_count().to_string())
        .with_metadata("fps", &format!("{:.2}", skeleton.frame_rate()))
        .with_metadata("order", skeleton.rotation_order().as_str())
        .with_metadata("channels", &skeleton.channel_count().to_string());
    if let Some(size) = size {
        root = root.with_size(size);
    }

    if !skeleton.nodes().is_empty() {
        root = root.add_child(joint_node(&skeleton, skeleton.root_id()));
    }

    let options = TreeOptions {
        // The file node sits above the skeleton root
        max_depth: depth.map(|d| d + 1),
        no_color,
        compact,
        ..Default::default()
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn joint_node(skeleton: &Skeleton, id: JointId) -> TreeNode {
    let joint = &skeleton[id];
    let node_type = if joint.is_root() {
        NodeType::Root
    } else if joint.is_end_site() {
        NodeType::EndSite
    } else {
        NodeType::Joint
    };

    let mut node = TreeNode::new(joint.name().to_string(), node_type)
        .with_metadata("offset", &format_vec3(joint.rest_pose().offset));
    if !joint.channels().is_empty() {
        let channels: Vec<&str> = joint.channels().iter().map(|c| c.as_str()).collect();
        node = node.with_metadata("channels", &channels.join(" "));
    }

    joint
        .children()
        .iter()
        .fold(node, |node, &child| node.add_child(joint_node(skeleton, child)))
}

fn execute_pose(path: &Path, frame: usize, joint: Option<&str>) -> Result<()> {
    use console::style;

    let skeleton = load(path)?;
    if frame >= skeleton.frame_count() {
        anyhow::bail!(
            "Frame {} out of range: {} has {} frames",
            frame,
            path.display(),
            skeleton.frame_count()
        );
    }

    let ids: Vec<JointId> = match joint {
        Some(name) => {
            let id = skeleton
                .find(name)
                .filter(|&id| !skeleton[id].is_end_site())
                .with_context(|| format!("Joint '{}' not found in {}", name, path.display()))?;
            vec![id]
        }
        None => skeleton.joint_ids().to_vec(),
    };

    println!(
        "\n{} {} ({:.3}s)",
        style("Frame").bold(),
        style(frame).green(),
        frame as f64 * skeleton.frame_time()
    );
    let mut table = create_table(vec![
        "Joint",
        "Global Position",
        "Global Rotation",
        "Delta From Rest",
    ]);
    for id in ids {
        let joint = &skeleton[id];
        let pose = joint
            .pose()
            .with_context(|| format!("Joint '{}' has no motion data", joint.name()))?;
        add_table_row(
            &mut table,
            vec![
                joint.name().to_string(),
                format_vec3(pose.global_position[frame]),
                format_quat(pose.global_rotation[frame]),
                format_vec3(pose.position_from_rest[frame]),
            ],
        );
    }
    table.printstd();
    Ok(())
}

#[cfg(feature = "serde")]
fn execute_export(input: &Path, output: &Path, format: ExportFormat) -> Result<()> {
    use console::style;
    use mocap_bvh::BvhDocument;

    let skeleton = load(input)?;
    let document = BvhDocument::from_skeleton(&skeleton);

    let encoded = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&document).context("Failed to encode JSON")?
        }
        ExportFormat::Yaml => {
            serde_yaml_ng::to_string(&document).context("Failed to encode YAML")?
        }
    };
    std::fs::write(output, encoded)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    println!(
        "✓ Exported {} joints and {} frames to {}",
        skeleton.joint_count(),
        skeleton.frame_count(),
        style(output.display()).green()
    );
    Ok(())
}
