//! Parser for the per-frame samples of the `MOTION` section

use std::io;

use glam::DVec3;
use log::{debug, trace};

use crate::channel::Channel;
use crate::error::{BvhError, Result};
use crate::rotation::quat_from_euler_degrees;
use crate::skeleton::{JointId, Pose, Skeleton};
use crate::source::LineSource;

/// Where a joint's values sit inside a motion line
#[derive(Debug, Clone)]
struct ChannelLayout {
    id: JointId,
    offset: usize,
    channels: Vec<Channel>,
}

/// Reads motion lines into each joint's pose
///
/// Every line must hold exactly one value per channel. The root's position
/// channels become its global position for the frame; every rotation triple
/// becomes the joint's local rotation, converted with the skeleton's rotation
/// order.
#[derive(Debug, Default)]
pub struct MotionParser;

impl MotionParser {
    pub fn new() -> Self {
        Self
    }

    /// Consume the remaining lines of `source` as motion samples
    ///
    /// Allocates a [`Pose`] sized to the declared frame count for every
    /// animated joint. Fails if any line has the wrong number of values, a
    /// value is not a number, or the number of lines differs from the
    /// declared frame count.
    pub fn parse<I>(&self, skeleton: &mut Skeleton, source: &mut LineSource<I>) -> Result<()>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let frame_count = skeleton.frame_count();
        let expected = skeleton.channel_count();
        let order = skeleton.rotation_order();

        let layouts: Vec<ChannelLayout> = skeleton
            .joint_ids()
            .iter()
            .map(|&id| ChannelLayout {
                id,
                offset: skeleton[id].channel_offset(),
                channels: skeleton[id].channels().to_vec(),
            })
            .collect();

        for layout in &layouts {
            skeleton.node_mut(layout.id).pose = Some(Pose::with_frames(frame_count));
        }

        let mut values = Vec::with_capacity(expected);
        let mut frame = 0;

        while let Some(line) = source.next_line()? {
            values.clear();
            for (index, token) in line.tokens().enumerate() {
                let value = token.parse::<f64>().map_err(|_| {
                    BvhError::numeric(
                        line.number,
                        format!("channel {index} of frame {frame}"),
                        token,
                    )
                })?;
                values.push(value);
            }

            if values.len() != expected {
                return Err(BvhError::FrameFieldCount {
                    frame,
                    expected,
                    found: values.len(),
                });
            }

            // Extra lines are still checked so the final count is reported
            if frame < frame_count {
                for layout in &layouts {
                    let mut position = DVec3::ZERO;
                    let mut angles = DVec3::ZERO;
                    for (k, channel) in layout.channels.iter().enumerate() {
                        let value = values[layout.offset + k];
                        if channel.is_position() {
                            position[channel.axis().index()] = value;
                        } else {
                            angles[channel.axis().index()] = value;
                        }
                    }

                    let is_root = skeleton[layout.id].is_root();
                    if let Some(pose) = skeleton.node_mut(layout.id).pose.as_mut() {
                        if is_root {
                            pose.global_position[frame] = position;
                        }
                        pose.rotation_from_rest[frame] = quat_from_euler_degrees(angles, order);
                    }
                }
                trace!("Frame {} read from line {}", frame, line.number);
            }

            frame += 1;
        }

        if frame != frame_count {
            return Err(BvhError::FrameCount {
                expected: frame_count,
                found: frame,
            });
        }

        debug!("Parsed {} motion frames", frame);
        Ok(())
    }
}
