/// Capability of a pin's on-screen representation.
///
/// One concrete implementation per rendering surface; the web viewer drives a
/// DOM anchor element through this seam, tests drive a recording stub.
pub trait PinView {
    /// Position in overlay-container pixels.
    fn set_position_px(&mut self, left: f64, top: f64);
    /// Shown pins are fully opaque and interactive; hidden pins are
    /// transparent and ignore pointer events.
    fn set_visible(&mut self, visible: bool);
    fn set_scale(&mut self, scale: f64);
    /// URL opened in a new browsing context on activation.
    fn activation_target(&self) -> &str;
}
