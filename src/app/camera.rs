use std::time::{Duration, Instant};

use eframe::egui::{Pos2, Rect, Vec2 as EguiVec2, pos2};

use super::math::{Vec3, vec3};

pub const DEFAULT_EYE: Vec3 = vec3(0.0, 0.0, 200.0);
pub const DEFAULT_TARGET: Vec3 = Vec3::ZERO;

const UP: Vec3 = vec3(0.0, 1.0, 0.0);
const FIELD_OF_VIEW_RADIANS: f32 = 50.0 * (std::f32::consts::PI / 180.0);
const NEAR_PLANE: f32 = 0.1;

/// Standoff distance between the camera and a focused node, measured along
/// the origin-to-node ray.
const FOCUS_STANDOFF: f32 = 40.0;
/// Nodes closer to the origin than this get a clamped fallback direction
/// instead of a division by a near-zero length.
const MIN_FOCUS_RADIUS: f32 = 1.0;
const PULL_BACK_FACTOR: f32 = 1.35;
const PULL_BACK_DURATION: Duration = Duration::from_millis(400);
const FLY_DURATION: Duration = Duration::from_millis(3000);
const RESET_DURATION: Duration = Duration::from_millis(1000);
/// How long after a reset before idle auto-orbit re-arms, kept longer than
/// the reset animation so it is not immediately interrupted.
const IDLE_REARM_DELAY: Duration = Duration::from_millis(2500);
const IDLE_ORBIT_RATE: f32 = 0.15; // radians per second
const ORBIT_DRAG_RATE: f32 = 0.008; // radians per pixel
const MIN_CAMERA_DISTANCE: f32 = 10.0;
const MAX_PITCH: f32 = 1.45;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Untouched viewport: constant-rate orbit around the focal target.
    IdleOrbit,
    /// The user is (or has been) driving the camera by hand.
    Navigating,
    /// Flying toward a selected node.
    Focused,
    /// Returning to the canonical pose.
    Resetting,
}

struct CameraTween {
    from_eye: Vec3,
    to_eye: Vec3,
    from_target: Vec3,
    to_target: Vec3,
    started_at: Instant,
    duration: Duration,
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let back = -2.0 * t + 2.0;
        1.0 - (back * back * back) / 2.0
    }
}

impl CameraTween {
    fn sample(&self, now: Instant) -> (Vec3, Vec3, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let eased = ease_in_out(t);
        (
            self.from_eye.lerp(self.to_eye, eased),
            self.from_target.lerp(self.to_target, eased),
            t >= 1.0,
        )
    }
}

/// Camera pose state machine. Tweens follow a strict latest-wins rule:
/// starting a new animation cancels whatever was in flight, there is no
/// queue of historical requests.
pub struct CameraRig {
    eye: Vec3,
    target: Vec3,
    mode: CameraMode,
    tween: Option<CameraTween>,
    /// Node position awaiting the second (fly-to) phase of a focus.
    pending_fly_to: Option<Vec3>,
    idle_rearm_at: Option<Instant>,
}

/// Vantage point for looking at a node: offset outward along the
/// origin-to-node ray. A degenerate (near-origin) node position is clamped
/// to a fallback ray rather than dividing by zero.
fn focus_vantage(node: Vec3) -> Vec3 {
    let radius = node.length();
    if radius < MIN_FOCUS_RADIUS {
        return node + vec3(0.0, 0.0, FOCUS_STANDOFF.max(MIN_FOCUS_RADIUS));
    }
    node * (1.0 + FOCUS_STANDOFF / radius)
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            eye: DEFAULT_EYE,
            target: DEFAULT_TARGET,
            mode: CameraMode::IdleOrbit,
            tween: None,
            pending_fly_to: None,
            idle_rearm_at: None,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn focal_target(&self) -> Vec3 {
        self.target
    }

    /// Advances tweens and idle orbiting. Returns true while anything is
    /// animating so the caller keeps repainting.
    pub fn update(&mut self, now: Instant, dt: f32) -> bool {
        if let Some(rearm_at) = self.idle_rearm_at
            && now >= rearm_at
            && self.tween.is_none()
        {
            self.idle_rearm_at = None;
            self.mode = CameraMode::IdleOrbit;
        }

        if let Some(tween) = &self.tween {
            let (eye, target, done) = tween.sample(now);
            self.eye = eye;
            self.target = target;
            if done {
                self.tween = None;
                if let Some(node) = self.pending_fly_to.take() {
                    // Phase two: fly to the vantage point, looking at the node.
                    self.tween = Some(CameraTween {
                        from_eye: self.eye,
                        to_eye: focus_vantage(node),
                        from_target: self.target,
                        to_target: node,
                        started_at: now,
                        duration: FLY_DURATION,
                    });
                }
            }
            return true;
        }

        if self.mode == CameraMode::IdleOrbit {
            let offset = self.eye - self.target;
            let angle = IDLE_ORBIT_RATE * dt;
            let (sin, cos) = angle.sin_cos();
            self.eye = self.target
                + vec3(
                    offset.x * cos + offset.z * sin,
                    offset.y,
                    -offset.x * sin + offset.z * cos,
                );
            return true;
        }

        // A pending re-arm deadline must keep the frame loop alive so it
        // actually fires on an otherwise quiet viewport.
        self.idle_rearm_at.is_some()
    }

    /// Starts the two-phase focus animation toward a node. A focus already
    /// in flight is cancelled immediately.
    pub fn focus_on(&mut self, node: Vec3, now: Instant) {
        self.idle_rearm_at = None;
        self.mode = CameraMode::Focused;
        self.pending_fly_to = Some(node);
        // Phase one: pull outward from wherever the camera is, keeping the
        // current look-at target.
        self.tween = Some(CameraTween {
            from_eye: self.eye,
            to_eye: self.target + ((self.eye - self.target) * PULL_BACK_FACTOR),
            from_target: self.target,
            to_target: self.target,
            started_at: now,
            duration: PULL_BACK_DURATION,
        });
    }

    /// Cancels any in-flight animation and animates back to the canonical
    /// pose. Idle orbit re-arms after a fixed delay.
    pub fn reset(&mut self, now: Instant) {
        self.pending_fly_to = None;
        self.mode = CameraMode::Resetting;
        self.tween = Some(CameraTween {
            from_eye: self.eye,
            to_eye: DEFAULT_EYE,
            from_target: self.target,
            to_target: DEFAULT_TARGET,
            started_at: now,
            duration: RESET_DURATION,
        });
        self.idle_rearm_at = Some(now + IDLE_REARM_DELAY);
    }

    /// Manual orbit drag. Entering navigation cancels any in-flight tween
    /// and pauses idle orbiting until the next reset.
    pub fn orbit_drag(&mut self, delta: EguiVec2) {
        self.enter_navigation();

        let offset = self.eye - self.target;
        let radius = offset.length().max(MIN_CAMERA_DISTANCE);
        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        yaw += delta.x * ORBIT_DRAG_RATE;
        pitch = (pitch + delta.y * ORBIT_DRAG_RATE).clamp(-MAX_PITCH, MAX_PITCH);

        self.eye = self.target
            + vec3(
                radius * pitch.cos() * yaw.cos(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.sin(),
            );
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(0.8);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.2);
    }

    fn zoom_by(&mut self, factor: f32) {
        self.enter_navigation();
        let offset = self.eye - self.target;
        let distance = (offset.length() * factor).max(MIN_CAMERA_DISTANCE);
        let direction = offset.normalized().unwrap_or(vec3(0.0, 0.0, 1.0));
        self.eye = self.target + (direction * distance);
    }

    fn enter_navigation(&mut self) {
        self.tween = None;
        self.pending_fly_to = None;
        self.idle_rearm_at = None;
        self.mode = CameraMode::Navigating;
    }

    /// Projects a world position into the viewport. Returns the screen
    /// position and a perspective scale factor for sizing sprites, or
    /// `None` when the point is behind the camera.
    pub fn project(&self, rect: Rect, world: Vec3) -> Option<(Pos2, f32)> {
        let forward = (self.target - self.eye)
            .normalized()
            .unwrap_or(vec3(0.0, 0.0, -1.0));
        let right = forward.cross(UP).normalized().unwrap_or(vec3(1.0, 0.0, 0.0));
        let up = right.cross(forward);

        let delta = world - self.eye;
        let depth = delta.dot(forward);
        if depth <= NEAR_PLANE {
            return None;
        }

        let focal = (rect.height() * 0.5) / (FIELD_OF_VIEW_RADIANS * 0.5).tan();
        let scale = focal / depth;
        let center = rect.center();
        Some((
            pos2(
                center.x + delta.dot(right) * scale,
                center.y - delta.dot(up) * scale,
            ),
            scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_still(rig: &mut CameraRig, mut now: Instant) -> Instant {
        // Idle orbit animates forever; only tweens are waited out here.
        while rig.tween.is_some() {
            now += Duration::from_millis(16);
            rig.update(now, 0.016);
        }
        now
    }

    #[test]
    fn focus_runs_pull_back_then_fly_to_vantage() {
        let mut rig = CameraRig::new();
        let now = Instant::now();
        let node = vec3(30.0, 40.0, 0.0); // length 50

        rig.focus_on(node, now);
        assert_eq!(rig.mode(), CameraMode::Focused);

        // During phase one the look-at target must not move.
        rig.update(now + Duration::from_millis(200), 0.016);
        assert_eq!(rig.focal_target(), DEFAULT_TARGET);

        run_until_still(&mut rig, now);
        assert_eq!(rig.focal_target(), node);

        // Standoff 40 on a radius-50 node: vantage at 1.8x the node ray.
        let expected = node * 1.8;
        assert!((rig.eye() - expected).length() < 0.5);
    }

    #[test]
    fn refocusing_mid_flight_wins_over_the_previous_target() {
        let mut rig = CameraRig::new();
        let now = Instant::now();
        let first = vec3(30.0, 40.0, 0.0);
        let second = vec3(0.0, 0.0, 60.0);

        rig.focus_on(first, now);
        rig.update(now + Duration::from_millis(600), 0.016);

        rig.focus_on(second, now + Duration::from_millis(700));
        run_until_still(&mut rig, now + Duration::from_millis(700));

        assert_eq!(rig.focal_target(), second);
        assert!((rig.eye() - focus_vantage(second)).length() < 0.5);
    }

    #[test]
    fn focusing_a_node_at_the_origin_stays_finite() {
        let vantage = focus_vantage(Vec3::ZERO);
        assert!(vantage.length() >= MIN_FOCUS_RADIUS);
        assert!(vantage.x.is_finite() && vantage.y.is_finite() && vantage.z.is_finite());

        let mut rig = CameraRig::new();
        let now = Instant::now();
        rig.focus_on(Vec3::ZERO, now);
        run_until_still(&mut rig, now);
        assert!(rig.eye().length().is_finite());
    }

    #[test]
    fn reset_returns_to_default_pose_and_rearms_idle_orbit() {
        let mut rig = CameraRig::new();
        let now = Instant::now();

        rig.focus_on(vec3(10.0, 20.0, 30.0), now);
        rig.update(now + Duration::from_millis(100), 0.016);
        rig.reset(now + Duration::from_millis(200));
        assert_eq!(rig.mode(), CameraMode::Resetting);

        let after = run_until_still(&mut rig, now + Duration::from_millis(200));
        assert!((rig.eye() - DEFAULT_EYE).length() < 0.5);
        assert_eq!(rig.focal_target(), DEFAULT_TARGET);

        rig.update(after + IDLE_REARM_DELAY, 0.016);
        assert_eq!(rig.mode(), CameraMode::IdleOrbit);
    }

    #[test]
    fn pending_idle_rearm_keeps_reporting_activity() {
        let mut rig = CameraRig::new();
        let now = Instant::now();

        rig.reset(now);
        let after = run_until_still(&mut rig, now);

        // The reset tween finishes well before the re-arm deadline; update
        // must still report activity so the deadline gets evaluated.
        assert_eq!(rig.mode(), CameraMode::Resetting);
        assert!(rig.update(after + Duration::from_millis(16), 0.016));

        rig.update(now + IDLE_REARM_DELAY, 0.016);
        assert_eq!(rig.mode(), CameraMode::IdleOrbit);
    }

    #[test]
    fn manual_navigation_pauses_idle_orbit_and_cancels_tweens() {
        let mut rig = CameraRig::new();
        let now = Instant::now();

        rig.focus_on(vec3(10.0, 0.0, 0.0), now);
        rig.orbit_drag(EguiVec2::new(12.0, -4.0));
        assert_eq!(rig.mode(), CameraMode::Navigating);
        assert!(rig.tween.is_none());

        // With no tween and no idle orbit, nothing keeps animating.
        assert!(!rig.update(now + Duration::from_millis(16), 0.016));
    }

    #[test]
    fn idle_orbit_keeps_the_camera_on_its_sphere() {
        let mut rig = CameraRig::new();
        let before = (rig.eye() - rig.focal_target()).length();
        let mut now = Instant::now();
        for _ in 0..120 {
            now += Duration::from_millis(16);
            assert!(rig.update(now, 0.016));
        }
        let after = (rig.eye() - rig.focal_target()).length();
        assert!((before - after).abs() < 0.01);
        assert!((rig.eye() - DEFAULT_EYE).length() > 1.0, "camera should have orbited");
    }

    #[test]
    fn zoom_scales_the_eye_distance() {
        let mut rig = CameraRig::new();
        rig.zoom_in();
        assert!(((rig.eye() - rig.focal_target()).length() - 160.0).abs() < 0.01);
        rig.zoom_out();
        assert!(((rig.eye() - rig.focal_target()).length() - 192.0).abs() < 0.01);
    }

    #[test]
    fn projection_centers_the_focal_target() {
        let rig = CameraRig::new();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), EguiVec2::new(800.0, 600.0));

        let (screen, _scale) = rig.project(rect, Vec3::ZERO).unwrap();
        assert!((screen.x - 400.0).abs() < 0.01);
        assert!((screen.y - 300.0).abs() < 0.01);

        // A point behind the camera does not project.
        assert!(rig.project(rect, vec3(0.0, 0.0, 500.0)).is_none());
    }
}
