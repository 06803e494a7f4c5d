//! The scene evaluation engine: ties the pane-chain resolver, keyframe sampler,
//! phase machine, and render-state/locale/override selection together into one
//! `sample(frame)` entry point.

use bannerkit_syntax::Logger;
use bannerkit_syntax::brlan::{Animation, PaneAnim, Tag, TagType};
use bannerkit_syntax::brlyt::Group;
use bannerkit_syntax::brlyt::material::{Material, MaterialColorChannel};
use bannerkit_syntax::brlyt::pane::{Pane, PaneHeader, TexCoord, Transform};
use bannerkit_syntax::brlyt::Layout;
use rustc_hash::FxHashMap;

use crate::animation::{AnimRole, AnimationEntry};
use crate::compose::{chain_alpha, chain_matrix, chain_visible, LocalState};
use crate::locale::{locale_of_chain, passes_locale_filter};
use crate::options::{RenderState, SceneOptions};
use crate::output::{DrawItem, PaneRef, ResolvedPaneState, SceneFrame};
use crate::pane_chain::{resolve_chains, Chain};
use crate::phase::{Phase, PhaseMachine};
use crate::sampler::sample_track;

/// The per-frame scene evaluator. Owns a deep clone of its source layout (see
/// the data model's lifetime rules) so attaching runtime-only bookkeeping never
/// mutates the caller's parsed tree.
pub struct Engine {
    layout: Layout,
    chains: Vec<Chain>,
    start_anim: Option<Animation>,
    loop_anim: Option<Animation>,
    options: SceneOptions,
    phase_machine: PhaseMachine,
}

impl Engine {
    /// Build an engine from a parsed layout, the pipeline's classified
    /// animation entries, and the caller's options. Pane chains are resolved
    /// once here; the active start/loop animation pair is selected according to
    /// the render-state filter.
    pub fn new(
        layout: Layout,
        anim_entries: Vec<AnimationEntry>,
        options: SceneOptions,
        logger: &dyn Logger,
    ) -> Self {
        let chains = resolve_chains(&layout.panes, logger);

        let selected_state = selected_render_state_name(&layout.groups, &options.render_state);

        let matches_state = |entry: &AnimationEntry| match (&entry.render_state, &selected_state) {
            (None, _) => true,
            (Some(state), Some(selected)) => state.eq_ignore_ascii_case(selected),
            (Some(_), None) => false,
        };

        let mut start_anim = None;
        let mut loop_anim = None;
        let mut generic_anim = None;
        for entry in anim_entries.into_iter().filter(matches_state) {
            match entry.role {
                AnimRole::Start => start_anim.get_or_insert(entry.animation),
                AnimRole::Loop => loop_anim.get_or_insert(entry.animation),
                AnimRole::Generic => generic_anim.get_or_insert(entry.animation),
            };
        }
        // A render state with only a standalone animation drives Loop/Hold the
        // same way a dedicated "loop" animation would.
        let loop_anim = loop_anim.or(generic_anim);

        let phase_machine = PhaseMachine::new(
            start_anim.as_ref().map(|a| a.frame_size),
            loop_anim.as_ref().map(|a| a.frame_size).unwrap_or(0.0),
            options.playback_mode,
        );

        Self {
            layout,
            chains,
            start_anim,
            loop_anim,
            options,
            phase_machine,
        }
    }

    pub fn reset(&mut self) {
        self.phase_machine.reset();
    }

    pub fn phase(&self) -> Phase {
        self.phase_machine.phase()
    }

    /// Sample the scene at an absolute global frame. Does not mutate internal
    /// playback state; safe to call repeatedly with arbitrary frames, matching
    /// the per-frame evaluator's "samples one frame on demand" contract.
    pub fn sample(&self, global_frame: f32, logger: &dyn Logger) -> SceneFrame {
        let (phase, effective_frame) = self.phase_machine.at_frame(global_frame);
        let active_anim = match phase {
            Phase::Start => self.start_anim.as_ref(),
            Phase::Loop | Phase::Hold => self.loop_anim.as_ref(),
        };
        let wrap = phase == Phase::Loop;

        let tracks_by_pane: FxHashMap<&str, &PaneAnim> = active_anim
            .map(|a| a.panes.iter().map(|p| (p.name.as_str(), p)).collect())
            .unwrap_or_default();

        let name_to_index: FxHashMap<&str, usize> = self
            .layout
            .panes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name(), i))
            .collect();

        let mut mask = render_state_mask(&self.layout, &self.options.render_state, &self.chains, &name_to_index);
        apply_pane_state_overrides(
            &self.layout,
            &self.options.pane_state_overrides,
            &self.chains,
            &name_to_index,
            &mut mask,
        );

        let names: Vec<&str> = self.layout.panes.iter().map(|p| p.name()).collect();
        let selected_locale = match &self.options.title_locale {
            crate::options::TitleLocale::Auto => None,
            crate::options::TitleLocale::Explicit(l) => Some(*l),
        };

        let mut draw_items = Vec::new();

        for (index, pane) in self.layout.panes.iter().enumerate() {
            if !mask[index] {
                continue;
            }

            let pane_locale = locale_of_chain(&self.chains[index], &names);
            if !passes_locale_filter(pane_locale, selected_locale) {
                continue;
            }

            let chain = &self.chains[index];
            let locals: Vec<LocalState> = chain
                .iter()
                .map(|&i| {
                    resolve_local_state(
                        self.layout.panes[i].header(),
                        tracks_by_pane.get(self.layout.panes[i].name()).copied(),
                        effective_frame,
                        wrap,
                    )
                })
                .collect();

            if !chain_visible(&locals) {
                logger.info(&format!("pane {:?} suppressed by ancestor visibility", pane.name()));
                continue;
            }

            let matrix = chain_matrix(&locals);
            let alpha = chain_alpha(&locals);

            let overrides = tracks_by_pane
                .get(pane.name())
                .map(|pa| collect_overrides(pa, effective_frame, wrap))
                .unwrap_or_default();

            let resolved = resolve_pane_state(&self.layout, pane, alpha, &overrides, logger);

            draw_items.push(DrawItem {
                matrix,
                pane: PaneRef {
                    index,
                    name: pane.name().to_string(),
                },
                resolved,
            });
        }

        SceneFrame {
            canvas_width: self.layout.width,
            canvas_height: self.layout.height,
            draw_items,
        }
    }
}

fn is_rso_name(name: &str) -> bool {
    name.len() > 3 && name[..3].eq_ignore_ascii_case("rso") && name[3..].chars().all(|c| c.is_ascii_digit())
}

fn selected_render_state_name(groups: &[Group], render_state: &RenderState) -> Option<String> {
    let rso_groups: Vec<&Group> = groups.iter().filter(|g| is_rso_name(&g.name)).collect();

    match render_state {
        RenderState::Auto => {
            if rso_groups.is_empty() {
                None
            } else {
                rso_groups
                    .iter()
                    .find(|g| g.name.eq_ignore_ascii_case("RSO0"))
                    .or_else(|| rso_groups.first())
                    .map(|g| g.name.clone())
            }
        }
        RenderState::Explicit(name) => Some(name.clone()),
    }
}

/// `None` selection (no `RSO<N>` groups at all) draws every pane; an explicit
/// selection naming a nonexistent group draws nothing, matching the documented
/// `RenderState::Explicit` failure mode.
fn render_state_mask(
    layout: &Layout,
    render_state: &RenderState,
    chains: &[Chain],
    name_to_index: &FxHashMap<&str, usize>,
) -> Vec<bool> {
    let rso_groups: Vec<&Group> = layout.groups.iter().filter(|g| is_rso_name(&g.name)).collect();

    let selected_group = match render_state {
        RenderState::Auto => {
            if rso_groups.is_empty() {
                return vec![true; chains.len()];
            }
            rso_groups
                .iter()
                .find(|g| g.name.eq_ignore_ascii_case("RSO0"))
                .or_else(|| rso_groups.first())
                .copied()
        }
        RenderState::Explicit(name) => match rso_groups.iter().find(|g| &g.name == name).copied() {
            found @ Some(_) => found,
            None => return vec![false; chains.len()],
        },
    };

    let Some(group) = selected_group else {
        return vec![true; chains.len()];
    };

    group_subtree_mask(group, chains, name_to_index)
}

fn group_subtree_mask(
    group: &Group,
    chains: &[Chain],
    name_to_index: &FxHashMap<&str, usize>,
) -> Vec<bool> {
    let roots: Vec<usize> = group
        .pane_names
        .iter()
        .filter_map(|n| name_to_index.get(n.as_str()).copied())
        .collect();

    chains
        .iter()
        .map(|chain| chain.iter().any(|c| roots.contains(c)))
        .collect()
}

/// Explicit pane-state overrides suppress every pane in a named group's subtree
/// except the chosen one, independent of (and applied after) render-state
/// filtering.
fn apply_pane_state_overrides(
    layout: &Layout,
    overrides: &FxHashMap<String, String>,
    chains: &[Chain],
    name_to_index: &FxHashMap<&str, usize>,
    mask: &mut [bool],
) {
    for (group_name, chosen) in overrides {
        let Some(group) = layout.groups.iter().find(|g| &g.name == group_name) else {
            continue;
        };
        for pane_name in &group.pane_names {
            if pane_name == chosen {
                continue;
            }
            if let Some(&root) = name_to_index.get(pane_name.as_str()) {
                for (i, chain) in chains.iter().enumerate() {
                    if chain.contains(&root) {
                        mask[i] = false;
                    }
                }
            }
        }
    }
}

/// All animation-driven field overrides collected for one pane at one frame,
/// before composition.
#[derive(Default)]
struct Overrides {
    translate: [Option<f32>; 3],
    rotate: [Option<f32>; 3],
    scale: [Option<f32>; 2],
    size: [Option<f32>; 2],
    alpha: Option<f32>,
    vertex_alpha: Option<f32>,
    visible: Option<bool>,
    /// `(srt_index, field_index 0..4, value)`.
    texture_srt: Vec<(usize, usize, f32)>,
    /// `(channel, component 0..3, value 0..255)`.
    material_color: Vec<(usize, usize, f32)>,
    /// `(texture_map_slot, pattern_value)`.
    texture_pattern: Vec<(usize, u16)>,
}

fn collect_overrides(pane_anim: &PaneAnim, frame: f32, wrap: bool) -> Overrides {
    let mut out = Overrides::default();
    for tag in &pane_anim.tags {
        apply_tag(tag, frame, wrap, &mut out);
    }
    out
}

fn apply_tag(tag: &Tag, frame: f32, wrap: bool, out: &mut Overrides) {
    for track in &tag.entries {
        let value = sample_track(track, frame, wrap);
        match tag.tag_type {
            TagType::Rlpa => match track.opcode {
                0x00 => out.translate[0] = Some(value),
                0x01 => out.translate[1] = Some(value),
                0x02 => out.translate[2] = Some(value),
                0x03 => out.rotate[0] = Some(value),
                0x04 => out.rotate[1] = Some(value),
                0x05 => out.rotate[2] = Some(value),
                0x06 => out.scale[0] = Some(value),
                0x07 => out.scale[1] = Some(value),
                0x08 => out.size[0] = Some(value),
                0x09 => out.size[1] = Some(value),
                0x0A => out.alpha = Some(value),
                _ => {}
            },
            TagType::Rlvc if track.opcode == 0x10 => out.vertex_alpha = Some(value),
            TagType::Rlvi if track.opcode == 0x00 => out.visible = Some(value >= 0.5),
            TagType::Rlts if track.opcode <= 4 => {
                out.texture_srt
                    .push((track.target_group as usize, track.opcode as usize, value));
            }
            TagType::Rlmc => {
                if let Some((channel, component)) = MaterialColorChannel::from_type_byte(track.target_group) {
                    out.material_color.push((channel as usize, component, value));
                }
            }
            TagType::Rltp => {
                out.texture_pattern.push((track.target_group as usize, value as u16));
            }
            _ => {}
        }
    }
}

fn resolve_local_state(
    header: &PaneHeader,
    pane_anim: Option<&PaneAnim>,
    frame: f32,
    wrap: bool,
) -> LocalState {
    let overrides = pane_anim
        .map(|pa| collect_overrides(pa, frame, wrap))
        .unwrap_or_default();

    let mut transform = header.transform;
    for axis in 0..3 {
        if let Some(v) = overrides.translate[axis] {
            transform.translate[axis] = v;
        }
        if let Some(v) = overrides.rotate[axis] {
            transform.rotate[axis] = v;
        }
    }
    for axis in 0..2 {
        if let Some(v) = overrides.scale[axis] {
            transform.scale[axis] = v;
        }
        if let Some(v) = overrides.size[axis] {
            transform.size[axis] = v;
        }
    }

    let alpha = overrides.alpha.unwrap_or(header.alpha as f32) / 255.0;
    let visible = overrides.visible.unwrap_or(header.visible);

    LocalState {
        transform,
        origin: header.origin,
        alpha,
        visible,
    }
}

fn resolve_pane_state(
    layout: &Layout,
    pane: &Pane,
    alpha: f32,
    overrides: &Overrides,
    logger: &dyn Logger,
) -> ResolvedPaneState {
    let default_colors = [[255u8; 4]; 4];

    let (material_index, mut vertex_colors, tex_coords) = match pane {
        Pane::Pic(_, pic) => (pic.material_index, pic.vertex_colors, pic.tex_coords.clone()),
        _ => (-1, default_colors, Vec::new()),
    };

    if let Some(va) = overrides.vertex_alpha {
        let a = va.clamp(0.0, 255.0) as u8;
        for c in vertex_colors.iter_mut() {
            c[3] = a;
        }
    }

    let material = usize::try_from(material_index)
        .ok()
        .and_then(|i| layout.materials.get(i));

    let blend_mode = material.map(|m| m.blend_mode);

    let material_color_registers = material.map(|m| {
        let mut registers = base_material_registers(m);
        for &(channel, component, value) in &overrides.material_color {
            if channel < registers.len() && component < 4 {
                registers[channel][component] = value.clamp(0.0, 255.0) as u8;
            }
        }
        registers
    });

    let active_texture_indices = match material {
        Some(m) => {
            let mut indices: Vec<u16> = m.texture_maps.iter().map(|t| t.texture_index).collect();
            for &(slot, value) in &overrides.texture_pattern {
                if let Some(slot_ref) = indices.get_mut(slot) {
                    *slot_ref = value;
                } else {
                    logger.warn(&format!(
                        "RLTP override targets texture map slot {slot} but pane {:?} material only has {} maps",
                        pane.name(),
                        indices.len()
                    ));
                }
            }
            indices
        }
        None => Vec::new(),
    };

    let texture_srts = match material {
        Some(m) => {
            let mut srts = m.texture_srts.clone();
            for &(srt_index, field, value) in &overrides.texture_srt {
                let Some(srt) = srts.get_mut(srt_index) else {
                    logger.warn(&format!(
                        "RLTS override targets texture SRT {srt_index} but pane {:?} material only has {} SRTs",
                        pane.name(),
                        srts.len()
                    ));
                    continue;
                };
                match field {
                    0 => srt.x_translate = value,
                    1 => srt.y_translate = value,
                    2 => srt.rotation = value,
                    3 => srt.x_scale = value,
                    4 => srt.y_scale = value,
                    _ => {}
                }
            }
            srts
        }
        None => Vec::new(),
    };

    ResolvedPaneState {
        alpha,
        blend_mode,
        tex_coords,
        vertex_colors,
        material_color_registers,
        active_texture_indices,
        texture_srts,
    }
}

/// Build the 8-entry material-color register layout from a material's static
/// fields: material (approximated from `tev_colors[0]`), color1-3, and
/// kColor0-2 (`tev_colors[1..4]`); kColor3 has no backing field in the parsed
/// `Material` and defaults to opaque black.
fn base_material_registers(material: &Material) -> [[u8; 4]; 8] {
    let quad_to_u8 = |q: [i16; 4]| -> [u8; 4] {
        [
            q[0].clamp(0, 255) as u8,
            q[1].clamp(0, 255) as u8,
            q[2].clamp(0, 255) as u8,
            q[3].clamp(0, 255) as u8,
        ]
    };

    [
        material.tev_colors[0],
        quad_to_u8(material.color1),
        quad_to_u8(material.color2),
        quad_to_u8(material.color3),
        material.tev_colors.get(1).copied().unwrap_or_default(),
        material.tev_colors.get(2).copied().unwrap_or_default(),
        material.tev_colors.get(3).copied().unwrap_or_default(),
        [0, 0, 0, 255],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bannerkit_syntax::brlyt::pane::{Origin, PicData};
    use bannerkit_syntax::diagnostics::NullLogger;

    fn default_transform() -> Transform {
        Transform {
            translate: [0.0, 0.0, 0.0],
            rotate: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0],
            size: [100.0, 50.0],
        }
    }

    fn pic_pane(name: &str, parent: Option<usize>, alpha: u8) -> Pane {
        Pane::Pic(
            PaneHeader {
                name: name.to_string(),
                visible: true,
                origin: Origin::Center,
                alpha,
                parent,
                transform: default_transform(),
            },
            PicData {
                vertex_colors: [[255, 255, 255, 255]; 4],
                material_index: -1,
                tex_coords: Vec::new(),
            },
        )
    }

    fn layout_with(panes: Vec<Pane>) -> Layout {
        Layout {
            width: 608.0,
            height: 456.0,
            textures: Vec::new(),
            fonts: Vec::new(),
            materials: Vec::new(),
            groups: Vec::new(),
            panes,
        }
    }

    #[test]
    fn s1_all_visible_panes_draw_at_full_alpha_with_no_loop_animation() {
        let layout = layout_with(vec![pic_pane("root", None, 255)]);
        let engine = Engine::new(layout, Vec::new(), SceneOptions::new(), &NullLogger);
        let frame = engine.sample(0.0, &NullLogger);
        assert_eq!(frame.draw_items.len(), 1);
        assert!((frame.draw_items[0].resolved.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn s3_chained_alpha_matches_spec_scenario() {
        use bannerkit_syntax::brlan::{Animation, DataType, Keyframe, PaneAnim, Tag, TagType, Track};

        let panes = vec![
            pic_pane("B", None, 255),
            pic_pane("A", Some(0), 255),
            pic_pane("leaf", Some(1), 128),
        ];
        let layout = layout_with(panes);

        let anim = Animation {
            frame_size: 60.0,
            loop_flag: false,
            panes: vec![PaneAnim {
                name: "A".to_string(),
                tags: vec![Tag {
                    tag_type: TagType::Rlpa,
                    entries: vec![Track {
                        target_group: 0,
                        opcode: 0x0A,
                        data_type: DataType::Linear,
                        keyframes: vec![
                            Keyframe { frame: 0.0, value: 0.0, blend: 0.0 },
                            Keyframe { frame: 60.0, value: 255.0, blend: 0.0 },
                        ],
                    }],
                }],
            }],
        };

        let entries = vec![AnimationEntry {
            role: AnimRole::Loop,
            render_state: None,
            animation: anim,
        }];

        let engine = Engine::new(layout, entries, SceneOptions::new(), &NullLogger);
        let frame = engine.sample(30.0, &NullLogger);
        let leaf = frame
            .draw_items
            .iter()
            .find(|d| d.pane.name == "leaf")
            .unwrap();
        assert!((leaf.resolved.alpha - 0.251).abs() < 1e-2);
    }

    #[test]
    fn ancestor_invisibility_suppresses_descendants() {
        let panes = vec![
            Pane::Pan(PaneHeader {
                name: "root".to_string(),
                visible: false,
                origin: Origin::Center,
                alpha: 255,
                parent: None,
                transform: default_transform(),
            }),
            pic_pane("child", Some(0), 255),
        ];
        let layout = layout_with(panes);
        let engine = Engine::new(layout, Vec::new(), SceneOptions::new(), &NullLogger);
        let frame = engine.sample(0.0, &NullLogger);
        assert!(frame.draw_items.is_empty());
    }

    #[test]
    fn render_state_selection_filters_to_group_subtree() {
        let mut layout = layout_with(vec![pic_pane("a", None, 255), pic_pane("b", None, 255)]);
        layout.groups.push(Group {
            name: "RSO0".to_string(),
            pane_names: vec!["a".to_string()],
        });
        layout.groups.push(Group {
            name: "RSO1".to_string(),
            pane_names: vec!["b".to_string()],
        });

        let mut options = SceneOptions::new();
        options.render_state = RenderState::Explicit("RSO1".to_string());
        let engine = Engine::new(layout, Vec::new(), options, &NullLogger);
        let frame = engine.sample(0.0, &NullLogger);
        assert_eq!(frame.draw_items.len(), 1);
        assert_eq!(frame.draw_items[0].pane.name, "b");
    }
}
