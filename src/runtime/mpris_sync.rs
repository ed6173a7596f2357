use crate::app::App;
use crate::mpris::MprisHandle;

/// Mirror the loaded track and playback state on the bus. The handle only
/// signals actual changes, so this runs every frame.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let transport = app.transport();
    mpris.set_track_metadata(transport.loaded(), app.now_playing(), transport.duration());
    mpris.set_playback(transport.state());
}
