use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::ecs::components::EntityId;
use crate::ecs::store::EntityStore;

/// Marker byte that starts an event record.
pub const EVENT_MARKER: u8 = 0xFF;

/// Bytes per entity in a frame record: x, y, action, hunger, energy.
pub const ENTITY_RECORD_LEN: usize = 4 + 4 + 1 + 4 + 4;

/// Binary per-tick state log for replay and diffing. All integers and floats
/// are little-endian.
///
/// Frame record: `frame: u64`, `entity_count: u64`, then per entity in id
/// order `x: f32`, `y: f32`, `action: u8`, `hunger: f32`, `energy: f32`.
///
/// Event record: `0xFF`, `frame: u64`, `entity: u32`, `name_len: u64`,
/// `name` bytes. Events carry the number of the next frame to be written.
pub struct ReplayLogger<W: Write> {
    out: W,
    frame: u64,
}

impl ReplayLogger<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ReplayLogger<W> {
    pub fn new(out: W) -> Self {
        Self { out, frame: 0 }
    }

    /// Number of frames written so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn log_frame(&mut self, store: &EntityStore) -> io::Result<()> {
        self.out.write_all(&self.frame.to_le_bytes())?;
        self.out.write_all(&(store.len() as u64).to_le_bytes())?;

        let t = store.transforms();
        let a = store.actions();
        let n = store.needs();
        let mut record = [0u8; ENTITY_RECORD_LEN];
        for i in 0..store.len() {
            record[0..4].copy_from_slice(&t.position[i].x.to_le_bytes());
            record[4..8].copy_from_slice(&t.position[i].y.to_le_bytes());
            record[8] = a.current[i].code();
            record[9..13].copy_from_slice(&n.hunger[i].to_le_bytes());
            record[13..17].copy_from_slice(&n.energy[i].to_le_bytes());
            self.out.write_all(&record)?;
        }

        self.frame += 1;
        Ok(())
    }

    pub fn log_event(&mut self, name: &str, entity: EntityId) -> io::Result<()> {
        self.out.write_all(&[EVENT_MARKER])?;
        self.out.write_all(&self.frame.to_le_bytes())?;
        self.out.write_all(&entity.0.to_le_bytes())?;
        self.out.write_all(&(name.len() as u64).to_le_bytes())?;
        self.out.write_all(name.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
