use std::collections::HashMap;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use crate::content::ContentNode;
use crate::util::stable_triple;

use super::forces::ForceParams;
use super::links::generate_links;
use super::math::{Vec3, vec3};
use super::settings::{LinkCategory, LinkSettings, VisualSettings};

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.0228;
const VELOCITY_DECAY: f32 = 0.4;
/// Settle window between pinning nodes and freeing them again when the
/// centering force is removed.
const PIN_SETTLE_WINDOW: Duration = Duration::from_millis(100);
const SEED_SPHERE_RADIUS: f32 = 100.0;

/// Per-node simulation state. Position and pin fields are owned here;
/// nothing outside the controller writes them.
pub struct SimNode {
    pub id: String,
    pub pos: Vec3,
    pub velocity: Vec3,
    pub pinned: Option<Vec3>,
}

/// An edge with endpoints resolved to node indices.
pub struct ResolvedEdge {
    pub source: usize,
    pub target: usize,
    pub category: LinkCategory,
}

/// Owns the live force simulation: node positions, resolved edges, the
/// d3-style temperature state, and the pin-and-release deadline.
pub struct Simulation {
    initialized: bool,
    nodes: Vec<SimNode>,
    index_by_id: HashMap<String, usize>,
    edges: Vec<ResolvedEdge>,
    params: ForceParams,
    visual: VisualSettings,
    alpha: f32,
    pin_release_at: Option<Instant>,
}

fn seed_position(node: &ContentNode, index: usize, total: usize) -> Vec3 {
    if let (Some(x), Some(y), Some(z)) = (node.x, node.y, node.z) {
        return vec3(x, y, z);
    }

    // Fibonacci sphere for nodes without an explicit seed, jittered by a
    // stable hash so identical datasets lay out identically.
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let i = index as f32;
    let n = total.max(1) as f32;
    let theta = TAU * i / golden_ratio;
    let phi = (1.0 - 2.0 * (i + 0.5) / n).clamp(-1.0, 1.0).acos();

    let (jx, jy, jz) = stable_triple(&node.id);
    vec3(
        SEED_SPHERE_RADIUS * phi.sin() * theta.cos() + jx * 4.0,
        SEED_SPHERE_RADIUS * phi.sin() * theta.sin() + jy * 4.0,
        SEED_SPHERE_RADIUS * phi.cos() + jz * 4.0,
    )
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            initialized: false,
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            edges: Vec::new(),
            params: ForceParams::from_settings(&LinkSettings::default()),
            visual: LinkSettings::default().visual,
            alpha: 0.0,
            pin_release_at: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Builds initial edges and parameters and heats the simulation.
    /// Calling this on an already-initialized instance is rejected; the
    /// running instance is left untouched.
    pub fn initialize(&mut self, content: &[ContentNode], settings: &LinkSettings) {
        if self.initialized {
            log::warn!("simulation already initialized; ignoring re-initialization");
            return;
        }

        self.nodes = content
            .iter()
            .enumerate()
            .map(|(index, node)| SimNode {
                id: node.id.clone(),
                pos: seed_position(node, index, content.len()),
                velocity: Vec3::ZERO,
                pinned: None,
            })
            .collect();
        self.index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        self.edges = self.resolve_links(content, settings);
        self.params = ForceParams::from_settings(settings);
        self.visual = settings.visual;
        self.alpha = 1.0;
        self.initialized = true;
    }

    /// Applies a complete settings snapshot: full edge regeneration,
    /// uniform visual parameters, new physics parameters (with the
    /// pin-and-release guard when the centering force goes away), and a
    /// mandatory re-heat so the layout visibly migrates.
    pub fn apply_settings(
        &mut self,
        content: &[ContentNode],
        settings: &LinkSettings,
        now: Instant,
    ) {
        if !self.initialized {
            log::warn!("apply_settings called before initialize; ignoring");
            return;
        }

        self.edges = self.resolve_links(content, settings);
        self.visual = settings.visual;

        let next = ForceParams::from_settings(settings);
        if self.params.center_force && !next.center_force {
            // Removing the centering force would otherwise make the whole
            // layout jump: pin every node where it stands, then release
            // after the settle window.
            for node in &mut self.nodes {
                node.pinned = Some(node.pos);
            }
            self.pin_release_at = Some(now + PIN_SETTLE_WINDOW);
        }
        self.params = next;

        self.alpha = 1.0;
    }

    /// Releases everything the simulation holds. Safe to call at any
    /// point, including after a failed or skipped initialize.
    pub fn teardown(&mut self) {
        self.nodes.clear();
        self.index_by_id.clear();
        self.edges.clear();
        self.pin_release_at = None;
        self.alpha = 0.0;
        self.initialized = false;
    }

    fn resolve_links(
        &self,
        content: &[ContentNode],
        settings: &LinkSettings,
    ) -> Vec<ResolvedEdge> {
        let links = generate_links(content, settings);
        let mut edges = Vec::with_capacity(links.len());

        for link in links {
            let (Some(&source), Some(&target)) = (
                self.index_by_id.get(&link.source),
                self.index_by_id.get(&link.target),
            ) else {
                debug_assert!(
                    false,
                    "edge {} -> {} references a node id missing from the simulation",
                    link.source, link.target
                );
                log::warn!(
                    "skipping edge {} -> {}: endpoint not in simulation",
                    link.source,
                    link.target
                );
                continue;
            };

            edges.push(ResolvedEdge {
                source,
                target,
                category: link.category,
            });
        }

        edges
    }

    /// One cooperative tick. Returns whether anything is still moving so
    /// the caller can keep requesting repaints.
    pub fn step(&mut self, now: Instant) -> bool {
        if let Some(release_at) = self.pin_release_at
            && now >= release_at
        {
            for node in &mut self.nodes {
                node.pinned = None;
            }
            self.pin_release_at = None;
        }

        if !self.initialized || self.nodes.len() < 2 || self.alpha < ALPHA_MIN {
            return false;
        }

        self.apply_repulsion();
        self.apply_springs();
        self.apply_collision();
        self.integrate();
        if self.params.center_force {
            self.recenter();
        }

        self.alpha += (0.0 - self.alpha) * ALPHA_DECAY;
        true
    }

    fn apply_repulsion(&mut self) {
        let strength = self.params.repulsion_strength;
        let max_distance_sq =
            self.params.repulsion_max_distance * self.params.repulsion_max_distance;

        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let delta = self.nodes[i].pos - self.nodes[j].pos;
                let distance_sq = delta.length_sq().max(1.0);
                if distance_sq > max_distance_sq {
                    continue;
                }

                // Negative strength repels, matching d3's many-body force.
                let weight = -strength * self.alpha / distance_sq;
                let kick = delta * weight;
                self.nodes[i].velocity += kick;
                self.nodes[j].velocity -= kick;
            }
        }
    }

    fn apply_springs(&mut self) {
        for edge in &self.edges {
            let params = self.params.link_params(Some(edge.category));
            if params.strength <= 0.0 {
                continue;
            }

            let delta = self.nodes[edge.target].pos - self.nodes[edge.source].pos;
            let distance = delta.length().max(1e-3);
            let displacement = (distance - params.distance) / distance;
            let correction = delta * (displacement * params.strength * self.alpha * 0.5);

            self.nodes[edge.source].velocity += correction;
            self.nodes[edge.target].velocity -= correction;
        }
    }

    fn apply_collision(&mut self) {
        let min_distance = self.params.collision_radius * 2.0;
        if min_distance <= 0.0 {
            return;
        }
        let strength = self.params.collision_strength;

        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let delta = self.nodes[i].pos - self.nodes[j].pos;
                let distance = delta.length().max(1e-3);
                if distance >= min_distance {
                    continue;
                }

                let push = delta * ((min_distance - distance) / distance * strength * 0.5);
                self.nodes[i].velocity += push;
                self.nodes[j].velocity -= push;
            }
        }
    }

    fn integrate(&mut self) {
        for node in &mut self.nodes {
            if let Some(pinned) = node.pinned {
                node.pos = pinned;
                node.velocity = Vec3::ZERO;
                continue;
            }

            node.velocity = node.velocity * (1.0 - VELOCITY_DECAY);
            node.pos += node.velocity;
        }
    }

    fn recenter(&mut self) {
        if self.nodes.is_empty() {
            return;
        }

        let mut centroid = Vec3::ZERO;
        for node in &self.nodes {
            centroid += node.pos;
        }
        centroid = centroid / self.nodes.len() as f32;

        for node in &mut self.nodes {
            node.pos -= centroid;
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn visual(&self) -> &VisualSettings {
        &self.visual
    }

    pub fn node_position(&self, index: usize) -> Option<Vec3> {
        self.nodes.get(index).map(|node| node.pos)
    }
}
