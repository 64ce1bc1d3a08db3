pub mod hit;
pub mod scene;
pub mod style;

pub use hit::{HANDLE_HIT_RADIUS_PX, HIT_MARGIN_PX, handle_at, hit_test};
pub use scene::{
    BoxVisual, DrawingVisual, HANDLE_RADIUS_PX, Halo, HandleVisual, LivePreview, Scene, SceneInput,
    ScreenMapping, build_scene,
};
pub use style::box_color;
