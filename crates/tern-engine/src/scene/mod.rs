//! Scene: the retained set of renderable objects.
//!
//! Responsibilities:
//! - own every live and template object (insertion-ordered live pool)
//! - build + upload geometry when objects are created
//! - hold per-frame update callbacks with fixed-per-frame snapshot semantics
//!
//! Everything here is single-threaded; interior mutability (`RefCell`)
//! stands in for the locks a threaded design would need.

mod object;

use std::cell::RefCell;
use std::rc::Rc;

use crate::device::Gpu;
use crate::geometry::{TexturedMesh, build_geometry};
use crate::render::{GpuMesh, ModelBinding};

pub use object::SceneObject;

/// Update callback run once per frame, before rendering.
pub type UpdateCallback = Box<dyn FnMut()>;

/// Per-frame callback list with snapshot semantics.
///
/// The set of callbacks for a frame is fixed before the first one runs:
/// callbacks registered during a frame (from inside a callback) first fire
/// on the next frame, and never observe a partially-run frame.
#[derive(Default)]
struct UpdateQueue {
    callbacks: RefCell<Vec<UpdateCallback>>,
}

impl UpdateQueue {
    fn register(&self, callback: UpdateCallback) {
        self.callbacks.borrow_mut().push(callback);
    }

    fn run_frame(&self) {
        // Take the list out so a callback registering another callback does
        // not re-borrow (or extend) the one being iterated.
        let mut snapshot = self.callbacks.take();
        for callback in snapshot.iter_mut() {
            callback();
        }

        // Registrations made during the frame land behind the snapshot,
        // preserving overall registration order.
        let added = self.callbacks.take();
        snapshot.extend(added);
        self.callbacks.replace(snapshot);
    }
}

struct SceneInner {
    gpu: Rc<Gpu>,
    live: RefCell<Vec<SceneObject>>,
    templates: RefCell<Vec<SceneObject>>,
    updates: UpdateQueue,
}

/// Handle to the scene. Cheap to clone; all clones address the same pools,
/// so update callbacks can capture one and create objects mid-run.
#[derive(Clone)]
pub struct Scene {
    inner: Rc<SceneInner>,
}

impl Scene {
    pub(crate) fn new(gpu: Rc<Gpu>) -> Self {
        Self {
            inner: Rc::new(SceneInner {
                gpu,
                live: RefCell::new(Vec::new()),
                templates: RefCell::new(Vec::new()),
                updates: UpdateQueue::default(),
            }),
        }
    }

    /// Creates an object from a textured mesh: builds the deduplicated
    /// vertex/index data, uploads it, and registers the object.
    ///
    /// With `add_to_scene` the object joins the live pool and renders every
    /// frame; without, it becomes a template — kept alive purely as a
    /// duplication source. The returned handle stays valid for the object's
    /// whole lifetime regardless of how many objects are added later.
    pub fn create_object(&self, textured: TexturedMesh, add_to_scene: bool) -> SceneObject {
        let gpu = &self.inner.gpu;
        let data = build_geometry(&textured);
        log::debug!(
            "object geometry: {} triangles -> {} vertices, {} indices",
            textured.mesh().len(),
            data.vertex_count(),
            data.index_count(),
        );

        let mesh = Rc::new(GpuMesh::upload(
            gpu.device(),
            gpu.queue(),
            &data,
            textured.mapping().image(),
        ));
        let object = SceneObject::new(mesh, ModelBinding::new(gpu.device()));

        if add_to_scene {
            self.inner.live.borrow_mut().push(object.clone());
        } else {
            self.inner.templates.borrow_mut().push(object.clone());
        }
        object
    }

    /// Creates a live copy of `source` (which may be a template).
    ///
    /// The transform scalars carry over, so the copy appears exactly where
    /// the source is; the GPU geometry is shared, not re-built. The two
    /// objects are independent from here on.
    pub fn duplicate_object(&self, source: &SceneObject) -> SceneObject {
        let object = source.duplicate(self.inner.gpu.device());
        self.inner.live.borrow_mut().push(object.clone());
        object
    }

    /// Registers a callback to run once per frame, before rendering.
    ///
    /// Callbacks run in registration order. A callback registered during a
    /// frame first runs on the following frame.
    pub fn add_update_callback(&self, callback: impl FnMut() + 'static) {
        self.inner.updates.register(Box::new(callback));
    }

    /// Number of live (rendered) objects.
    pub fn live_count(&self) -> usize {
        self.inner.live.borrow().len()
    }

    /// Runs this frame's update callbacks.
    pub(crate) fn run_update_callbacks(&self) {
        self.inner.updates.run_frame();
    }

    /// Visits every live object in insertion order.
    pub(crate) fn for_each_live(&self, mut f: impl FnMut(&SceneObject)) {
        for object in self.inner.live.borrow().iter() {
            f(object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_run_in_registration_order() {
        let queue = UpdateQueue::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            queue.register(Box::new(move || order.borrow_mut().push(tag)));
        }

        queue.run_frame();
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);

        queue.run_frame();
        assert_eq!(*order.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn callback_registered_during_a_frame_runs_next_frame() {
        let queue = Rc::new(UpdateQueue::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        {
            let log = Rc::clone(&log);
            let queue2 = Rc::clone(&queue);
            queue.register(Box::new(move || {
                log.borrow_mut().push("outer");
                let log = Rc::clone(&log);
                queue2.register(Box::new(move || log.borrow_mut().push("inner")));
            }));
        }

        queue.run_frame();
        assert_eq!(*log.borrow(), vec!["outer"]);

        // Second frame: the outer callback runs first (and registers yet
        // another inner), then the inner registered on frame one.
        queue.run_frame();
        assert_eq!(*log.borrow(), vec!["outer", "outer", "inner"]);
    }
}
