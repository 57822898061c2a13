//! Parser for the `HIERARCHY` section and the `MOTION` header
//!
//! Builds the joint tree, the channel layout and the frame metadata. Parsing
//! stops right after the `Frame Time:` line, leaving the line source positioned
//! on the first motion sample.

use std::io;

use glam::DVec3;
use log::{debug, trace};

use crate::channel::Channel;
use crate::error::{BvhError, Result};
use crate::skeleton::{Joint, JointId, Skeleton};
use crate::source::{Line, LineSource};
use crate::validation::validate_rotation_orders;

/// Channels declared by the root: three position plus three rotation
pub const ROOT_CHANNELS: usize = 6;
/// Channels declared by every other joint: rotation only
pub const JOINT_CHANNELS: usize = 3;

/// A node whose closing brace has not been seen yet
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    id: JointId,
    has_offset: bool,
    has_channels: bool,
}

/// Parser for the structural part of a BVH file
///
/// Keeps a stack with one entry per nesting level: entry `d` is the node
/// declared at depth `d`. A new `JOINT` attaches to the entry at `depth - 1`,
/// and a closing brace pops the stack so a later sibling finds the right
/// parent again.
#[derive(Debug)]
pub struct HierarchyParser {
    skeleton: Skeleton,
    depth: usize,
    stack: Vec<OpenNode>,
    seen_header: bool,
    seen_motion: bool,
    frame_count: Option<usize>,
}

impl Default for HierarchyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyParser {
    pub fn new() -> Self {
        Self {
            skeleton: Skeleton::new(),
            depth: 0,
            stack: Vec::new(),
            seen_header: false,
            seen_motion: false,
            frame_count: None,
        }
    }

    /// Consume lines up to and including `Frame Time:`
    ///
    /// On success the skeleton has its full tree, channel layout, frame count,
    /// frame time and validated rotation order. Rest pose and motion data are
    /// not filled in yet.
    pub fn parse<I>(mut self, source: &mut LineSource<I>) -> Result<Skeleton>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        while let Some(line) = source.next_line()? {
            if self.parse_line(&line)? {
                validate_rotation_orders(&mut self.skeleton)?;
                debug!(
                    "Parsed hierarchy: {} joints, {} end sites, {} channels, {} frames, rotation order {}",
                    self.skeleton.joint_count(),
                    self.skeleton.end_sites.len(),
                    self.skeleton.channel_count,
                    self.skeleton.frame_count,
                    self.skeleton.rotation_order
                );
                return Ok(self.skeleton);
            }
        }

        Err(BvhError::structural(
            source.line_number(),
            "",
            "unexpected end of input before 'Frame Time:'",
        ))
    }

    /// Handle one line; returns `true` once the hierarchy phase is over
    fn parse_line(&mut self, line: &Line) -> Result<bool> {
        let tokens: Vec<&str> = line.tokens().collect();
        let keyword = tokens[0];

        if !self.seen_header {
            if tokens.as_slice() != ["HIERARCHY"] {
                return Err(BvhError::structural(
                    line.number,
                    &line.content,
                    "expected 'HIERARCHY'",
                ));
            }
            self.seen_header = true;
            return Ok(false);
        }

        if self.seen_motion {
            return self.parse_motion_header(line, &tokens);
        }

        match keyword {
            "ROOT" => self.open_root(line, &tokens)?,
            "JOINT" => self.open_joint(line, &tokens)?,
            "{" => self.open_brace(line)?,
            "}" => self.close_brace(line)?,
            "OFFSET" => self.parse_offset(line, &tokens)?,
            "CHANNELS" => self.parse_channels(line, &tokens)?,
            "MOTION" => self.begin_motion(line)?,
            _ if keyword.to_lowercase().starts_with("end") => self.open_end_site(line)?,
            _ => {
                return Err(BvhError::structural(
                    line.number,
                    &line.content,
                    format!("unrecognized token '{keyword}'"),
                ));
            }
        }
        Ok(false)
    }

    fn open_root(&mut self, line: &Line, tokens: &[&str]) -> Result<()> {
        if !self.skeleton.nodes.is_empty() {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "a skeleton has exactly one ROOT",
            ));
        }
        let name = Self::joint_name(line, tokens)?;
        let id = self.skeleton.push(Joint::new(name, None, 0));
        trace!("ROOT {} at line {}", name, line.number);
        self.push_open(id);
        Ok(())
    }

    fn open_joint(&mut self, line: &Line, tokens: &[&str]) -> Result<()> {
        let name = Self::joint_name(line, tokens)?;
        let parent = self.current_parent(line)?;
        let id = self
            .skeleton
            .push(Joint::new(name, Some(parent), self.depth));
        trace!(
            "JOINT {} under {} at depth {}",
            name,
            self.skeleton[parent].name(),
            self.depth
        );
        self.push_open(id);
        Ok(())
    }

    fn open_end_site(&mut self, line: &Line) -> Result<()> {
        let parent = self.current_parent(line)?;
        let name = format!("{}_End", self.skeleton[parent].name());
        let id = self
            .skeleton
            .push(Joint::end_site(name, parent, self.depth));
        self.push_open(id);
        Ok(())
    }

    fn push_open(&mut self, id: JointId) {
        self.stack.push(OpenNode {
            id,
            has_offset: false,
            has_channels: false,
        });
    }

    fn joint_name<'a>(line: &Line, tokens: &[&'a str]) -> Result<&'a str> {
        match tokens {
            [_, name] => Ok(*name),
            _ => Err(BvhError::structural(
                line.number,
                &line.content,
                "expected a single joint name",
            )),
        }
    }

    /// The joint a new child at the current depth attaches to
    fn current_parent(&self, line: &Line) -> Result<JointId> {
        if self.depth == 0 || self.stack.len() != self.depth {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "child declared outside of an open joint block",
            ));
        }
        let parent = self.stack[self.depth - 1].id;
        if self.skeleton[parent].is_end_site() {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "End Site cannot have children",
            ));
        }
        Ok(parent)
    }

    /// The node whose braces enclose the current line
    fn current_node(&mut self, line: &Line) -> Result<&mut OpenNode> {
        if self.depth == 0 || self.stack.len() != self.depth {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "property outside of a joint block",
            ));
        }
        Ok(&mut self.stack[self.depth - 1])
    }

    fn open_brace(&mut self, line: &Line) -> Result<()> {
        if self.stack.len() != self.depth + 1 {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "'{' without a preceding ROOT, JOINT or End Site",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn close_brace(&mut self, line: &Line) -> Result<()> {
        if self.depth == 0 || self.stack.len() != self.depth {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "unmatched closing brace",
            ));
        }
        let open = self.stack.pop().ok_or_else(|| {
            BvhError::structural(line.number, &line.content, "unmatched closing brace")
        })?;
        let joint = &self.skeleton[open.id];

        if joint.is_end_site() {
            if !open.has_offset {
                let owner = self.skeleton.parent(open.id).map_or("", Joint::name);
                return Err(BvhError::structural(
                    line.number,
                    &line.content,
                    format!("End Site of '{owner}' has no OFFSET"),
                ));
            }
        } else if !open.has_channels {
            return Err(BvhError::ChannelCount {
                joint: joint.name().to_string(),
                expected: if joint.is_root() {
                    ROOT_CHANNELS
                } else {
                    JOINT_CHANNELS
                },
                found: 0,
            });
        }

        self.depth -= 1;
        Ok(())
    }

    fn parse_offset(&mut self, line: &Line, tokens: &[&str]) -> Result<()> {
        if tokens.len() != 4 {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                format!("OFFSET expects 3 values, found {}", tokens.len() - 1),
            ));
        }

        let mut values = [0.0; 3];
        for (value, (token, axis)) in values.iter_mut().zip(tokens[1..].iter().zip(["x", "y", "z"])) {
            *value = token
                .parse::<f64>()
                .map_err(|_| BvhError::numeric(line.number, format!("OFFSET {axis}"), token))?;
        }

        let open = self.current_node(line)?;
        if open.has_offset {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "duplicate OFFSET",
            ));
        }
        open.has_offset = true;
        let id = open.id;
        self.skeleton.node_mut(id).rest_pose.offset = DVec3::from_array(values);
        Ok(())
    }

    fn parse_channels(&mut self, line: &Line, tokens: &[&str]) -> Result<()> {
        let open = *self.current_node(line)?;
        let joint = &self.skeleton[open.id];

        if joint.is_end_site() {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "End Site cannot declare channels",
            ));
        }
        if open.has_channels {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "duplicate CHANNELS",
            ));
        }

        let count_token = tokens.get(1).ok_or_else(|| {
            BvhError::structural(line.number, &line.content, "CHANNELS without a count")
        })?;
        let count = count_token
            .parse::<usize>()
            .map_err(|_| BvhError::numeric(line.number, "channel count", count_token))?;

        let expected = if joint.is_root() {
            ROOT_CHANNELS
        } else {
            JOINT_CHANNELS
        };
        if count != expected {
            return Err(BvhError::ChannelCount {
                joint: joint.name().to_string(),
                expected,
                found: count,
            });
        }

        let names = &tokens[2..];
        if names.len() != count {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                format!("declared {count} channels but listed {}", names.len()),
            ));
        }

        let channels = names
            .iter()
            .map(|name| {
                name.parse::<Channel>()
                    .map_err(|e| BvhError::structural(line.number, &line.content, e))
            })
            .collect::<Result<Vec<_>>>()?;

        // Root: translation triple first, then rotations. Others: rotations only.
        let layout_ok = if joint.is_root() {
            channels[..3].iter().all(|c| c.is_position())
                && channels[3..].iter().all(|c| c.is_rotation())
        } else {
            channels.iter().all(|c| c.is_rotation())
        };
        if !layout_ok {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                format!("invalid channel layout for joint '{}'", joint.name()),
            ));
        }

        if let Some(open) = self.stack.last_mut() {
            open.has_channels = true;
        }
        let offset = self.skeleton.channel_count;
        let node = self.skeleton.node_mut(open.id);
        node.channels = channels;
        node.channel_offset = offset;
        self.skeleton.channel_count += count;
        Ok(())
    }

    fn begin_motion(&mut self, line: &Line) -> Result<()> {
        if self.skeleton.nodes.is_empty() {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                "MOTION before any ROOT",
            ));
        }
        if self.depth != 0 || !self.stack.is_empty() {
            return Err(BvhError::structural(
                line.number,
                &line.content,
                format!("{} unclosed brace(s) before MOTION", self.stack.len()),
            ));
        }
        self.seen_motion = true;
        Ok(())
    }

    fn parse_motion_header(&mut self, line: &Line, tokens: &[&str]) -> Result<bool> {
        match tokens {
            ["Frames:", ..] => {
                let [_, count] = tokens else {
                    return Err(BvhError::structural(
                        line.number,
                        &line.content,
                        "invalid number of frames",
                    ));
                };
                let count = count
                    .parse::<usize>()
                    .map_err(|_| BvhError::numeric(line.number, "frame count", count))?;
                self.frame_count = Some(count);
                Ok(false)
            }
            ["Frame", "Time:", ..] => {
                let [_, _, time] = tokens else {
                    return Err(BvhError::structural(
                        line.number,
                        &line.content,
                        "invalid frame time",
                    ));
                };
                let Some(frame_count) = self.frame_count else {
                    return Err(BvhError::structural(
                        line.number,
                        &line.content,
                        "'Frame Time:' before 'Frames:'",
                    ));
                };
                let frame_time = time
                    .parse::<f64>()
                    .map_err(|_| BvhError::numeric(line.number, "frame time", time))?;
                if !frame_time.is_finite() || frame_time <= 0.0 {
                    return Err(BvhError::structural(
                        line.number,
                        &line.content,
                        "frame time must be a positive number",
                    ));
                }

                self.skeleton.frame_count = frame_count;
                self.skeleton.frame_time = frame_time;
                self.skeleton.frame_rate = 1.0 / frame_time;
                Ok(true)
            }
            _ => Err(BvhError::structural(
                line.number,
                &line.content,
                "expected 'Frames:' or 'Frame Time:'",
            )),
        }
    }
}
