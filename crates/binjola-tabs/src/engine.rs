//! Rendering engine collaborator
//!
//! The core never renders. It drives an external engine through this trait and
//! receives the engine's load events through the registry. Dropping the box
//! releases the engine.

pub trait RenderEngine {
    fn navigate(&mut self, url: &str);
    fn go_back(&mut self);
    fn go_forward(&mut self);
    fn reload(&mut self);
}

/// Creates one engine per new tab
pub trait EngineFactory {
    fn create_engine(&mut self) -> Box<dyn RenderEngine>;
}

impl<F> EngineFactory for F
where
    F: FnMut() -> Box<dyn RenderEngine>,
{
    fn create_engine(&mut self) -> Box<dyn RenderEngine> {
        self()
    }
}
