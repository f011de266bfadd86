use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use crate::assets::fragment::{FragmentNode, SceneFragment};
use crate::errors::{KeyportalError, Result};
use crate::scene::{BoundingBox, Mesh};

/// Decodes binary glTF (`.glb`) into a [`SceneFragment`].
///
/// Only the data the scene needs is kept: node hierarchy and TRS, mesh bounds
/// (from the position accessor min/max) and TRS animation channels. Geometry,
/// materials and textures are left to the renderer. External buffers are not
/// supported; everything must live in the GLB binary chunk.
pub struct GltfLoader;

impl GltfLoader {
    pub fn load_glb(name: &str, bytes: &[u8]) -> Result<SceneFragment> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = Self::load_buffers(&gltf)?;

        let mut fragment = SceneFragment::new(name);
        Self::load_nodes(&gltf, &mut fragment);
        fragment.clips = Self::load_animations(&gltf, &buffers)?
            .into_iter()
            .map(std::sync::Arc::new)
            .collect();

        log::debug!(
            "Decoded '{}': {} nodes, clips {:?}",
            name,
            fragment.nodes.len(),
            fragment.clip_names()
        );
        Ok(fragment)
    }

    fn load_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut buffers = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf.blob.as_ref().ok_or_else(|| {
                        KeyportalError::GltfError("GLB binary chunk is missing".to_string())
                    })?;
                    buffers.push(blob.clone());
                }
                gltf::buffer::Source::Uri(uri) => {
                    return Err(KeyportalError::GltfError(format!(
                        "external buffer '{uri}' is not supported, embed it in the .glb"
                    )));
                }
            }
        }
        Ok(buffers)
    }

    fn node_name(node: &gltf::Node) -> String {
        node.name()
            .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
    }

    /// Walks the default scene depth-first so that parents land before
    /// their children.
    fn load_nodes(gltf: &gltf::Gltf, fragment: &mut SceneFragment) {
        let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
            return;
        };

        let mut stack: Vec<(gltf::Node, Option<usize>)> = scene.nodes().map(|n| (n, None)).collect();
        stack.reverse();
        let mut visited: HashMap<usize, usize> = HashMap::new();

        while let Some((gltf_node, parent)) = stack.pop() {
            if visited.contains_key(&gltf_node.index()) {
                log::warn!("glTF node {} is referenced twice, skipping", gltf_node.index());
                continue;
            }

            let name = Self::node_name(&gltf_node);
            let (translation, rotation, scale) = gltf_node.transform().decomposed();

            let mut node = FragmentNode::new(name.clone());
            node.position = Vec3::from_array(translation);
            node.rotation = Quat::from_array(rotation);
            node.scale = Vec3::from_array(scale);
            node.mesh = gltf_node.mesh().and_then(|mesh| {
                Self::mesh_bounds(&mesh).map(|bounds| Mesh::new(mesh.name().unwrap_or(&name), bounds))
            });

            let index = fragment.push_node(node, parent);
            visited.insert(gltf_node.index(), index);

            for child in gltf_node.children().collect::<Vec<_>>().into_iter().rev() {
                stack.push((child, Some(index)));
            }
        }
    }

    fn mesh_bounds(mesh: &gltf::Mesh) -> Option<BoundingBox> {
        mesh.primitives()
            .map(|primitive| {
                let bounds = primitive.bounding_box();
                BoundingBox::new(Vec3::from_array(bounds.min), Vec3::from_array(bounds.max))
            })
            .reduce(|a, b| a.union(&b))
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let mut tracks = Vec::new();

            for (channel_index, channel) in anim.channels().enumerate() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_name = Self::node_name(&target.node());

                let times: Vec<f32> = reader
                    .read_inputs()
                    .ok_or_else(|| KeyportalError::AssetIndexOutOfBounds {
                        context: format!("animation '{}' input accessor", anim.name().unwrap_or("anim")),
                        index: channel_index,
                    })?
                    .collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let Some(outputs) = reader.read_outputs() else {
                    continue;
                };

                let (target_path, data) = match outputs {
                    gltf::animation::util::ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => {
                        log::debug!("Skipping morph target channel on '{node_name}'");
                        continue;
                    }
                };

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            animations.push(AnimationClip::new(anim.name().unwrap_or("anim"), tracks));
        }

        Ok(animations)
    }
}
