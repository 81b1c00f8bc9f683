//! Entity core: geometry, lifecycle, and event dispatch
//!
//! An entity is the base unit of simulation. It owns its serializable
//! state (name, geometry, enabled flag, links, behavior) and a weak
//! room token; the room exclusively owns the entity itself. All event
//! firing and action invocation flows through the room's name index.

pub mod behaviors;

use glam::Vec2;

use crate::actions::catalog::{self, ActionCall};
use crate::actions::links::{EventActionLink, LinkTable};
use crate::actions::value::ParamMap;
use crate::core::error::Result;
use crate::core::types::{aabb_contains, aabb_overlap, RoomId};
use crate::world::room::{Room, RoomCtx};
use behaviors::Behavior;

/// One simulated entity
///
/// Geometry anchor convention: `position` is the horizontal center of
/// the entity's bottom edge; `y` grows downward.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    position: Vec2,
    size: Vec2,
    enabled: bool,
    pub texture: String,
    pub links: LinkTable,
    pub behavior: Behavior,
    /// Weak back-reference: lookup only, never drives lifetime
    room: Option<RoomId>,
}

impl Entity {
    pub fn new(name: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            position: Vec2::ZERO,
            size: Vec2::ONE,
            enabled: true,
            texture: String::new(),
            links: LinkTable::new(),
            behavior,
            room: None,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_link(mut self, event: &str, link: EventActionLink) -> Self {
        self.links.add_link(event, link);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    pub(crate) fn set_room(&mut self, room: Option<RoomId>) {
        self.room = room;
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Place without bounds checking; used for spawn placement
    pub(crate) fn set_position_forced(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.position.x - self.size.x / 2.0, self.position.y - self.size.y)
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.position.x + self.size.x / 2.0, self.position.y)
    }

    /// Half-open box overlap; an entity never collides with itself
    pub fn collides_with(&self, other: &Entity) -> bool {
        if self.name == other.name {
            return false;
        }
        aabb_overlap(
            self.top_left(),
            self.bottom_right(),
            other.top_left(),
            other.bottom_right(),
        )
    }

    pub fn collides_point(&self, point: Vec2) -> bool {
        aabb_contains(self.top_left(), self.bottom_right(), point)
    }

    /// True when unassociated with the given room, or when the bounding
    /// box leaves `[0, width) x [0, height)` (strict on the lower bound,
    /// inclusive-exceeding on the upper)
    pub fn is_out_of_bounds(&self, room: &Room) -> bool {
        if self.room != Some(room.id()) {
            return true;
        }
        Self::box_out_of_bounds(self.position, self.size, room)
    }

    fn box_out_of_bounds(position: Vec2, size: Vec2, room: &Room) -> bool {
        let tl = Vec2::new(position.x - size.x / 2.0, position.y - size.y);
        let br = Vec2::new(position.x + size.x / 2.0, position.y);
        let extents = room.tiles.pixel_extents();
        tl.x < 0.0 || tl.y < 0.0 || br.x >= extents.x || br.y >= extents.y
    }

    /// Move to `target` (added to the current position when `relative`).
    ///
    /// Without `force`, a destination whose bounding box leaves the room
    /// is rejected and the position is left unchanged. Fires `OnMove` on
    /// success and returns whether the move happened.
    pub fn try_move(&mut self, ctx: &mut RoomCtx, target: Vec2, relative: bool, force: bool) -> bool {
        let dest = if relative { self.position + target } else { target };
        if !force {
            let associated = self.room == Some(ctx.room.id());
            if !associated || Self::box_out_of_bounds(dest, self.size, ctx.room) {
                ctx.room.sink_mut().warn(
                    Some(&self.name),
                    format!("move to ({}, {}) rejected: out of bounds", dest.x, dest.y),
                );
                return false;
            }
        }
        self.position = dest;
        self.fire_event(ctx, "OnMove");
        true
    }

    /// Resize to `target` (added to the current size when `relative`).
    ///
    /// Rejects non-positive dimensions and out-of-bounds results; fires
    /// `OnResize` on success.
    pub fn try_resize(&mut self, ctx: &mut RoomCtx, target: Vec2, relative: bool) -> bool {
        let dest = if relative { self.size + target } else { target };
        if dest.x <= 0.0 || dest.y <= 0.0 {
            ctx.room.sink_mut().warn(
                Some(&self.name),
                format!("resize to ({}, {}) rejected: non-positive size", dest.x, dest.y),
            );
            return false;
        }
        let associated = self.room == Some(ctx.room.id());
        if !associated || Self::box_out_of_bounds(self.position, dest, ctx.room) {
            ctx.room.sink_mut().warn(
                Some(&self.name),
                format!("resize to ({}, {}) rejected: out of bounds", dest.x, dest.y),
            );
            return false;
        }
        self.size = dest;
        self.fire_event(ctx, "OnResize");
        true
    }

    /// Idempotent enable/disable; the transition runs the behavior's
    /// init/destroy hook. Hook faults are caught here and reported,
    /// never propagated.
    pub fn set_enabled(&mut self, ctx: &mut RoomCtx, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !ctx.room.is_loaded() {
            return;
        }
        let result = if enabled {
            behaviors::init(self, ctx)
        } else {
            behaviors::destroy(self, ctx)
        };
        if let Err(err) = result {
            let hook = if enabled { "init" } else { "destroy" };
            let pos = self.position;
            ctx.room.sink_mut().error(
                Some(&self.name),
                format!("{hook} fault at ({}, {}): {err}", pos.x, pos.y),
            );
        }
    }

    /// Resolve and run an action method by name.
    ///
    /// An unresolved name is a reported error. A disabled entity only
    /// runs methods flagged executable-when-disabled; otherwise the
    /// invocation is skipped.
    pub fn run_action_method(
        &mut self,
        ctx: &mut RoomCtx,
        method: &str,
        sender: &str,
        params: &ParamMap,
    ) {
        let Some(spec) = catalog::lookup(self.behavior.kind(), method) else {
            ctx.room.sink_mut().error(
                Some(&self.name),
                format!("unknown action method '{method}' (sender: {sender})"),
            );
            return;
        };
        if !self.enabled && !spec.executable_when_disabled {
            return;
        }
        let call = ActionCall { sender, params };
        if let Err(err) = (spec.handler)(self, ctx, &call) {
            let name = self.name.clone();
            ctx.room
                .sink_mut()
                .error(Some(&name), format!("action '{method}' rejected: {err}"));
        }
    }

    /// Fire an event through this entity's link table.
    ///
    /// No-op without registered links or a room. Rejected with a warning
    /// when the room is not in its tick phase, so load-time init and
    /// editor mutation never invoke links. An unresolved target is a
    /// reported error and the remaining links still run.
    pub fn fire_event(&mut self, ctx: &mut RoomCtx, event: &str) {
        if self.room.is_none() || self.links.links_for(event).is_empty() {
            return;
        }
        if !ctx.room.is_ticking() {
            ctx.room.sink_mut().warn(
                Some(&self.name),
                format!("event '{event}' fired outside the tick phase; links not invoked"),
            );
            return;
        }
        if ctx.depth >= ctx.room.config().max_dispatch_depth {
            ctx.room.sink_mut().error(
                Some(&self.name),
                format!("event '{event}' dropped: dispatch depth limit reached"),
            );
            return;
        }
        let links: Vec<EventActionLink> = self.links.links_for(event).to_vec();
        let sender = self.name.clone();
        ctx.depth += 1;
        for link in links {
            if link.target == sender {
                // A link may target its own sender; the sender is already
                // detached from its slot, so invoke directly.
                self.run_action_method(ctx, &link.action, &sender, &link.params);
                continue;
            }
            let Some(idx) = ctx.room.index_of(&link.target) else {
                ctx.room.sink_mut().error(
                    Some(&sender),
                    format!("link target '{}' not found for event '{event}'", link.target),
                );
                continue;
            };
            match ctx.room.take_slot(idx) {
                None => ctx.room.sink_mut().error(
                    Some(&sender),
                    format!(
                        "link target '{}' is already executing in this dispatch chain; skipped",
                        link.target
                    ),
                ),
                Some(mut target) => {
                    target.run_action_method(ctx, &link.action, &sender, &link.params);
                    ctx.room.restore_slot(idx, target);
                }
            }
        }
        ctx.depth -= 1;
    }

    /// Clone for spawning: serializable fields only, under a new name.
    ///
    /// Runtime-only state (room association, timer progress, gate
    /// counters, trigger latches) is reset to defaults.
    pub fn clone_spawned(&self, name: impl Into<String>) -> Entity {
        let mut clone = self.clone();
        clone.name = name.into();
        clone.room = None;
        clone.behavior.reset_runtime();
        clone
    }

    pub(crate) fn tick(&mut self, ctx: &mut RoomCtx) -> Result<()> {
        behaviors::tick(self, ctx)
    }

    pub(crate) fn after_tick(&mut self, ctx: &mut RoomCtx) -> Result<()> {
        behaviors::after_tick(self, ctx)
    }

    pub(crate) fn run_init(&mut self, ctx: &mut RoomCtx) -> Result<()> {
        behaviors::init(self, ctx)
    }

    pub(crate) fn run_destroy(&mut self, ctx: &mut RoomCtx) -> Result<()> {
        behaviors::destroy(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, pos: Vec2, size: Vec2) -> Entity {
        Entity::new(name, Behavior::Static)
            .with_position(pos)
            .with_size(size)
    }

    #[test]
    fn test_anchor_is_center_bottom() {
        let e = entity("crate", Vec2::new(4.0, 6.0), Vec2::new(2.0, 3.0));
        assert_eq!(e.top_left(), Vec2::new(3.0, 3.0));
        assert_eq!(e.bottom_right(), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_never_collides_with_itself() {
        let e = entity("crate", Vec2::new(4.0, 6.0), Vec2::new(2.0, 3.0));
        let same = e.clone();
        assert!(!e.collides_with(&same));
    }

    #[test]
    fn test_collision_is_half_open() {
        let a = entity("a", Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        // b's left edge exactly touches a's right edge: no overlap
        let b = entity("b", Vec2::new(4.0, 2.0), Vec2::new(2.0, 2.0));
        assert!(!a.collides_with(&b));
        let c = entity("c", Vec2::new(3.5, 2.0), Vec2::new(2.0, 2.0));
        assert!(a.collides_with(&c));
    }

    #[test]
    fn test_collides_point_on_edges() {
        let e = entity("pad", Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        assert!(e.collides_point(Vec2::new(1.0, 0.0)));
        assert!(!e.collides_point(Vec2::new(3.0, 0.0)));
        assert!(!e.collides_point(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_clone_spawned_resets_runtime_state() {
        let mut source = Entity::new(
            "shooter",
            Behavior::Timer(behaviors::timer::Timer {
                interval: 5.0,
                clock: behaviors::timer::TimerClock::Frames,
                repeat: true,
                elapsed: 3.0,
            }),
        );
        source.set_room(Some(RoomId::next()));
        let clone = source.clone_spawned("shooter0");
        assert_eq!(clone.name(), "shooter0");
        assert!(clone.room().is_none());
        match clone.behavior {
            Behavior::Timer(ref t) => {
                assert_eq!(t.interval, 5.0);
                assert_eq!(t.elapsed, 0.0);
            }
            _ => panic!("behavior kind changed by clone"),
        }
    }
}
