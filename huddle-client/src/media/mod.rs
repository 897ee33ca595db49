mod media_engine;
mod media_event;
mod webrtc_engine;

pub use media_engine::MediaEngine;
pub use media_event::MediaEvent;
pub use webrtc_engine::WebRtcEngine;
