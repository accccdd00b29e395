use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use motion_maze_actuator::Panel;
use motion_maze_engine::Engine;
use motion_maze_world::WorldConfig;

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sink lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn dropping_the_engine_flushes_its_panel() {
    let sink = SharedSink::default();
    let mut engine = Engine::new(WorldConfig::new(11)).expect("engine");
    engine.set_actuator(Box::new(Panel::spawn(sink.clone())));

    let _ = engine.start();
    drop(engine);

    assert_eq!(
        *sink.0.lock().expect("sink lock"),
        vec![0x11, 0x23, 0x37, 0x11, 0x37]
    );
}
