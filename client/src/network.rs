use crate::script::InputScript;
use log::{info, warn};
use shared::{decode_frame, output_len, FrameView, InitMsg};
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::sleep;

/// Headless driver: sends scripted input and reads back one frame per tick
pub struct Client {
    stream: TcpStream,
    num_particles: usize,
    script: InputScript,
    frame_bytes: Vec<u8>,

    fake_ping_ms: u64,
    ticks: u64,

    // Stats for the periodic report
    frames_since_report: u32,
    last_report: Instant,
}

impl Client {
    /// Connects to the server and sends the init record.
    pub async fn connect(
        server_addr: &str,
        init: InitMsg,
        script: InputScript,
        fake_ping_ms: u64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to server...");
        let mut stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        stream.write_all(&init.encode()?).await?;

        info!(
            "Connected to {}: {} particles in {}x{}",
            server_addr, init.num_particles, init.width, init.height
        );

        let num_particles = init.num_particles as usize;
        Ok(Client {
            stream,
            num_particles,
            script,
            frame_bytes: vec![0u8; output_len(num_particles) * 4],
            fake_ping_ms,
            ticks: 0,
            frames_since_report: 0,
            last_report: Instant::now(),
        })
    }

    /// Runs one tick. Returns None once the server has closed the connection.
    pub async fn step(&mut self) -> Result<Option<FrameView>, Box<dyn std::error::Error>> {
        let input = self.script.next_frame();

        if self.fake_ping_ms > 0 {
            sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
        }
        if let Err(e) = self.stream.write_all(&input.encode()?).await {
            if is_disconnect(&e) {
                return Ok(None);
            }
            return Err(e.into());
        }

        match self.stream.read_exact(&mut self.frame_bytes).await {
            Ok(_) => {}
            Err(e) if is_disconnect(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        if self.fake_ping_ms > 0 {
            sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
        }

        self.ticks += 1;
        let frame = decode_frame(&self.frame_bytes, self.num_particles)?;
        self.report(&frame);
        Ok(Some(frame))
    }

    /// Runs `ticks` ticks, or until the server hangs up when `ticks` is zero.
    /// Returns the number of frames received.
    pub async fn run(&mut self, ticks: u64) -> Result<u64, Box<dyn std::error::Error>> {
        while ticks == 0 || self.ticks < ticks {
            if self.step().await?.is_none() {
                warn!("Server closed the connection after {} ticks", self.ticks);
                break;
            }
        }
        Ok(self.ticks)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn report(&mut self, frame: &FrameView) {
        self.frames_since_report += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_report as f32 / elapsed.as_secs_f32();
            info!(
                "FPS: {:.1}, live particles: {}/{}, projectiles: {}",
                fps,
                frame.live_particles(),
                self.num_particles,
                frame.projectiles.len()
            );
            self.frames_since_report = 0;
            self.last_report = Instant::now();
        }
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::BrokenPipe
    )
}
