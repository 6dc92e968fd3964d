#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadRoster,
    LoadDetail { id: u16 },
    LoadArtwork { id: u16, url: String },
    PlayCry { id: u16 },
    WatchCry,
    ClearCache,
}
