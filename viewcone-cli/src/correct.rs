use crate::{
    input::read_json,
    options::{Correct, Network, Terrain},
};
use anyhow::Result;
use log::info;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    time::Duration,
};
use viewcone::{
    batch::correct_altitudes,
    terrain::{HttpTileFetch, Tiles},
    AltitudeCorrector, CameraPose,
};

impl Terrain {
    pub fn corrector(&self, network: &Network) -> Result<AltitudeCorrector<HttpTileFetch>> {
        let fetch = HttpTileFetch::new(
            self.tile_url.as_str(),
            self.access_token.clone(),
            Duration::from_secs(network.timeout),
        )?
        .retries(network.retries);
        Ok(AltitudeCorrector::new(Tiles::new(fetch)).zoom(self.zoom))
    }
}

impl Correct {
    pub fn run(&self) -> Result<()> {
        let mut poses: Vec<CameraPose> = read_json(&self.poses)?;
        let corrector = self.terrain.corrector(&self.network)?;
        let corrected = correct_altitudes(&corrector, &mut poses);
        info!(
            "corrected {corrected} of {} poses; tiles: {}",
            poses.len(),
            corrector.tiles().len()
        );
        match &self.out {
            Some(out) => {
                let tmp_path = out.with_extension("tmp");
                let mut wtr = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut wtr, &poses)?;
                wtr.flush()?;
                drop(wtr);
                fs::rename(tmp_path, out)?;
            }
            None => {
                let mut wtr = BufWriter::new(io::stdout().lock());
                serde_json::to_writer_pretty(&mut wtr, &poses)?;
                writeln!(wtr)?;
            }
        }
        Ok(())
    }
}
