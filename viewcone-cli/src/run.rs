use crate::{input::read_json, options::Run};
use anyhow::Result;
use log::info;
use std::time::Duration;
use viewcone::{
    batch::{assemble_features, correct_altitudes},
    collection::{merge, read_collection, write_collection},
    CameraPose, FeatureAssembler, Metadata, MetadataIndex, Offline, Policy, SubjectLocator,
    Wikidata,
};

impl Run {
    pub fn run(&self) -> Result<()> {
        let mut poses: Vec<CameraPose> = read_json(&self.poses)?;
        let index: MetadataIndex = read_json::<Vec<Metadata>>(&self.metadata)?
            .into_iter()
            .collect();
        info!("{} poses, {} catalog records", poses.len(), index.len());

        if !self.skip_altitude {
            let corrector = self.terrain.corrector(&self.network)?;
            let corrected = correct_altitudes(&corrector, &mut poses);
            info!("corrected {corrected} of {} poses", poses.len());
        }

        let assembler = FeatureAssembler::new(self.locator()?, self.policy());
        let features = assemble_features(&assembler, &poses, &index);
        info!("built {} of {} viewcones", features.len(), poses.len());

        let mut collection = read_collection(&self.collection)?;
        merge(&mut collection, features);
        write_collection(&self.collection, &collection)?;
        info!(
            "{} holds {} features",
            self.collection.display(),
            collection.features.len()
        );
        Ok(())
    }

    fn locator(&self) -> Result<Box<dyn SubjectLocator + Send + Sync>> {
        if self.offline {
            return Ok(Box::new(Offline));
        }
        let wikidata = Wikidata::new(
            self.wikidata.as_str(),
            Duration::from_secs(self.network.timeout),
        )?
        .retries(self.network.retries);
        Ok(Box::new(wikidata))
    }

    fn policy(&self) -> Policy {
        Policy {
            min_radius: self.min_radius,
            default_radius: self.default_radius,
            max_tilt: self.max_tilt,
            steps: self.steps,
            source: self.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::Cli;
    use clap::Parser;
    use std::{ffi::OsStr, fs};
    use viewcone::{collection::read_collection, CameraPose};

    const POSES: &str = r#"[
        {
            "id": "0071824cri0001-01",
            "longitude": -43.17512,
            "latitude": -22.90395,
            "altitude": 500.0,
            "heading": 212.0,
            "tilt": 45.0,
            "left_fov": -30.0,
            "right_fov": 30.0,
            "altitude_mode": "absolute"
        },
        {
            "id": "uncatalogued",
            "longitude": -43.2,
            "latitude": -22.95,
            "altitude": 20.0,
            "heading": 0.0,
            "tilt": 80.0,
            "left_fov": -20.0,
            "right_fov": 20.0,
            "altitude_mode": "absolute"
        }
    ]"#;

    const METADATA: &str = r#"[
        {"id": "0071824CRI0001-01", "title": "Botafogo", "date_circa": "c. 1890"}
    ]"#;

    #[test]
    fn test_offline_run() {
        let dir = tempfile::tempdir().unwrap();
        let poses = dir.path().join("poses.json");
        let metadata = dir.path().join("metadata.json");
        let collection = dir.path().join("viewcones.geojson");
        fs::write(&poses, POSES).unwrap();
        fs::write(&metadata, METADATA).unwrap();

        let Cli::Run(run) = Cli::try_parse_from([
            OsStr::new("viewcone"),
            OsStr::new("run"),
            OsStr::new("--offline"),
            OsStr::new("--skip-altitude"),
            OsStr::new("--metadata"),
            metadata.as_os_str(),
            OsStr::new("--collection"),
            collection.as_os_str(),
            poses.as_os_str(),
        ])
        .unwrap() else {
            panic!("expected the run subcommand");
        };
        run.run().unwrap();
        run.run().unwrap();

        let collection = read_collection(&collection).unwrap();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(
            feature.property("id").and_then(|id| id.as_str()),
            Some("0071824CRI0001-01")
        );
        assert_eq!(
            feature.property("source").and_then(|s| s.as_str()),
            Some("Instituto Moreira Salles")
        );

        // Inputs are left alone.
        let poses: Vec<CameraPose> =
            serde_json::from_str(&fs::read_to_string(poses).unwrap()).unwrap();
        assert_eq!(poses.len(), 2);
    }
}
