use std::cell::RefCell;
use std::rc::Rc;

use crate::render::{GpuMesh, ModelBinding};
use crate::transform::Transform;

struct ObjectState {
    transform: Transform,
    mesh: Rc<GpuMesh>,
    binding: ModelBinding,
}

/// Handle to a renderable object.
///
/// Cloning the handle aliases the same object (callbacks capture clones to
/// animate it); [`Scene::duplicate_object`](crate::scene::Scene::duplicate_object)
/// is what creates an independent copy. Only the scene constructs objects,
/// so every object's GPU state is registered with exactly one owner.
///
/// The transform setters and getters are the mutation surface: each setter
/// writes one scalar and keeps the cached total matrix current (see
/// [`Transform`]).
#[derive(Clone)]
pub struct SceneObject {
    state: Rc<RefCell<ObjectState>>,
}

impl SceneObject {
    pub(crate) fn new(mesh: Rc<GpuMesh>, binding: ModelBinding) -> Self {
        Self {
            state: Rc::new(RefCell::new(ObjectState {
                transform: Transform::identity(),
                mesh,
                binding,
            })),
        }
    }

    /// A new object at the same position/rotation/scale, sharing this
    /// object's GPU geometry. Transform mutations stay independent.
    pub(crate) fn duplicate(&self, device: &wgpu::Device) -> Self {
        let source = self.state.borrow();
        let transform = Transform::from_parts(
            source.transform.translation(),
            source.transform.rotation(),
            source.transform.scale(),
        );

        Self {
            state: Rc::new(RefCell::new(ObjectState {
                transform,
                mesh: Rc::clone(&source.mesh),
                binding: ModelBinding::new(device),
            })),
        }
    }

    // ── transform surface ─────────────────────────────────────────────────

    pub fn set_translate_x(&self, value: f32) {
        self.state.borrow_mut().transform.set_translate_x(value);
    }

    pub fn set_translate_y(&self, value: f32) {
        self.state.borrow_mut().transform.set_translate_y(value);
    }

    pub fn set_translate_z(&self, value: f32) {
        self.state.borrow_mut().transform.set_translate_z(value);
    }

    pub fn set_rotate_x(&self, radians: f32) {
        self.state.borrow_mut().transform.set_rotate_x(radians);
    }

    pub fn set_rotate_y(&self, radians: f32) {
        self.state.borrow_mut().transform.set_rotate_y(radians);
    }

    pub fn set_rotate_z(&self, radians: f32) {
        self.state.borrow_mut().transform.set_rotate_z(radians);
    }

    pub fn set_scale(&self, scale: f32) {
        self.state.borrow_mut().transform.set_scale(scale);
    }

    pub fn translate_x(&self) -> f32 {
        self.state.borrow().transform.translate_x()
    }

    pub fn translate_y(&self) -> f32 {
        self.state.borrow().transform.translate_y()
    }

    pub fn translate_z(&self) -> f32 {
        self.state.borrow().transform.translate_z()
    }

    pub fn rotate_x(&self) -> f32 {
        self.state.borrow().transform.rotate_x()
    }

    pub fn rotate_y(&self) -> f32 {
        self.state.borrow().transform.rotate_y()
    }

    pub fn rotate_z(&self) -> f32 {
        self.state.borrow().transform.rotate_z()
    }

    pub fn scale(&self) -> f32 {
        self.state.borrow().transform.scale()
    }

    // ── renderer surface ──────────────────────────────────────────────────

    /// Writes the current total matrix into the object's model UBO.
    pub(crate) fn write_model(&self, queue: &wgpu::Queue) {
        let state = self.state.borrow();
        let total = state.transform.total_matrix();
        state.binding.write_model(queue, total);
    }

    /// Gives the renderer access to the object's binding and geometry.
    pub(crate) fn with_binding(&self, f: impl FnOnce(&ModelBinding, &GpuMesh)) {
        let state = self.state.borrow();
        f(&state.binding, &state.mesh);
    }
}
