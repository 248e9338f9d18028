use super::templates::{
    FINISH_FILE, INPCRD_FILE, MINIMIZATION_FILE, OPTIONS_FILE, PERM_ALLOW_FILE, PRMTOP_FILE,
    START_FILE,
};
use crate::core::io::error::FormatError;
use crate::core::io::listing::CoordinateListing;
use crate::core::io::traits::StructureWriter;
use crate::core::models::permutation::PermutationGroup;
use crate::engine::config::{ControlFiles, SystemFiles};
use crate::engine::error::SpawnError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Everything a connect job writes into its working directory.
#[derive(Debug, Clone, Copy)]
pub struct JobRequest<'a> {
    pub start: &'a [f64],
    pub finish: &'a [f64],
    pub atom_count: usize,
    pub permutations: &'a PermutationGroup,
    pub files: &'a SystemFiles,
    pub controls: &'a ControlFiles,
}

impl JobRequest<'_> {
    /// Checks both endpoints and the permutation groups against the topology size.
    pub fn validate(&self) -> Result<(), SpawnError> {
        let expected = 3 * self.atom_count;
        for (endpoint, coords) in [(START_FILE, self.start), (FINISH_FILE, self.finish)] {
            if coords.len() != expected {
                return Err(SpawnError::CoordinateMismatch {
                    endpoint,
                    expected,
                    found: coords.len(),
                });
            }
        }
        self.permutations.validate_against(self.atom_count)?;
        Ok(())
    }

    /// Populates `dir` with the complete input set. Existing files are overwritten.
    pub fn write_into(&self, dir: &Path) -> Result<(), SpawnError> {
        self.validate()?;

        let write_err = |file: &'static str| {
            move |source: io::Error| SpawnError::WriteInput {
                file,
                workdir: dir.to_path_buf(),
                source,
            }
        };

        CoordinateListing::write_to_path(self.start, dir.join(START_FILE))
            .map_err(listing_io_error)
            .map_err(write_err(START_FILE))?;
        CoordinateListing::write_to_path(self.finish, dir.join(FINISH_FILE))
            .map_err(listing_io_error)
            .map_err(write_err(FINISH_FILE))?;

        for (from, name) in [
            (&self.files.prmtop, PRMTOP_FILE),
            (&self.files.inpcrd, INPCRD_FILE),
        ] {
            fs::copy(from, dir.join(name)).map_err(|source| SpawnError::CopyInput {
                from: from.clone(),
                workdir: dir.to_path_buf(),
                source,
            })?;
        }

        fs::write(dir.join(MINIMIZATION_FILE), &self.controls.minimization)
            .map_err(write_err(MINIMIZATION_FILE))?;
        fs::write(
            dir.join(PERM_ALLOW_FILE),
            format_perm_allow(self.permutations),
        )
        .map_err(write_err(PERM_ALLOW_FILE))?;
        fs::write(dir.join(OPTIONS_FILE), &self.controls.options)
            .map_err(write_err(OPTIONS_FILE))?;

        debug!("Wrote connect job inputs into {:?}.", dir);
        Ok(())
    }
}

fn listing_io_error(error: FormatError) -> io::Error {
    match error {
        FormatError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

/// Renders permutation groups in the engine's allow-list grammar.
///
/// The first line holds the group count. Each group follows as a `"<size> 0"` line and a
/// line of 1-based atom indices.
pub fn format_perm_allow(group: &PermutationGroup) -> String {
    let mut out = format!("{}\n", group.len());
    for atoms in group.groups() {
        out.push_str(&format!("{} 0\n", atoms.len()));
        let indices: Vec<String> = atoms.iter().map(|i| (i + 1).to_string()).collect();
        out.push_str(&indices.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::traits::StructureFile;
    use crate::engine::job::templates::{MINIMIZATION_CONTROL, OPTIONS};
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        files: SystemFiles,
        out: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let prmtop = dir.path().join("ala.prmtop");
        let inpcrd = dir.path().join("ala.inpcrd");
        fs::write(&prmtop, "%VERSION fake\n").unwrap();
        fs::write(&inpcrd, "title\n     2\n").unwrap();
        let out = dir.path().join("run");
        fs::create_dir(&out).unwrap();
        Fixture {
            files: SystemFiles { prmtop, inpcrd },
            out,
            _dir: dir,
        }
    }

    #[test]
    fn perm_allow_for_one_group_of_three() {
        let group = PermutationGroup::new(vec![vec![4, 5, 6]]).unwrap();
        assert_eq!(format_perm_allow(&group), "1\n3 0\n5 6 7\n");
    }

    #[test]
    fn perm_allow_for_empty_group_declares_zero_groups() {
        assert_eq!(format_perm_allow(&PermutationGroup::empty()), "0\n");
    }

    #[test]
    fn perm_allow_lists_groups_in_order() {
        let group = PermutationGroup::new(vec![vec![0, 2], vec![7, 8, 9]]).unwrap();
        assert_eq!(format_perm_allow(&group), "2\n2 0\n1 3\n3 0\n8 9 10\n");
    }

    #[test]
    fn validate_rejects_wrong_endpoint_length() {
        let fx = fixture();
        let controls = ControlFiles::default();
        let group = PermutationGroup::empty();
        let request = JobRequest {
            start: &[0.0; 6],
            finish: &[0.0; 3],
            atom_count: 2,
            permutations: &group,
            files: &fx.files,
            controls: &controls,
        };
        assert!(matches!(
            request.validate(),
            Err(SpawnError::CoordinateMismatch {
                endpoint: "finish",
                expected: 6,
                found: 3
            })
        ));
    }

    #[test]
    fn validate_rejects_permutations_beyond_atom_count() {
        let fx = fixture();
        let controls = ControlFiles::default();
        let group = PermutationGroup::new(vec![vec![1, 2]]).unwrap();
        let request = JobRequest {
            start: &[0.0; 6],
            finish: &[0.0; 6],
            atom_count: 2,
            permutations: &group,
            files: &fx.files,
            controls: &controls,
        };
        assert!(matches!(
            request.validate(),
            Err(SpawnError::Permutation { .. })
        ));
    }

    #[test]
    fn write_into_produces_the_full_input_set() {
        let fx = fixture();
        let controls = ControlFiles::default();
        let group = PermutationGroup::new(vec![vec![0, 1]]).unwrap();
        let start = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let finish = [0.5, 0.25, -1.0, 0.0, 0.0, 0.0];
        let request = JobRequest {
            start: &start,
            finish: &finish,
            atom_count: 2,
            permutations: &group,
            files: &fx.files,
            controls: &controls,
        };
        request.write_into(&fx.out).unwrap();

        assert_eq!(
            fs::read_to_string(fx.out.join(START_FILE)).unwrap(),
            "1.000000 2.000000 3.000000\n4.000000 5.000000 6.000000\n"
        );
        let finish_back = CoordinateListing::read_from_path(fx.out.join(FINISH_FILE)).unwrap();
        assert_eq!(finish_back.as_slice(), &finish);
        assert_eq!(
            fs::read_to_string(fx.out.join(PRMTOP_FILE)).unwrap(),
            "%VERSION fake\n"
        );
        assert_eq!(
            fs::read_to_string(fx.out.join(INPCRD_FILE)).unwrap(),
            "title\n     2\n"
        );
        assert_eq!(
            fs::read_to_string(fx.out.join(MINIMIZATION_FILE)).unwrap(),
            MINIMIZATION_CONTROL
        );
        assert_eq!(
            fs::read_to_string(fx.out.join(PERM_ALLOW_FILE)).unwrap(),
            "1\n2 0\n1 2\n"
        );
        assert_eq!(fs::read_to_string(fx.out.join(OPTIONS_FILE)).unwrap(), OPTIONS);
    }

    #[test]
    fn missing_parameter_file_is_a_copy_error() {
        let mut fx = fixture();
        fx.files.inpcrd = fx.out.join("does-not-exist.inpcrd");
        let controls = ControlFiles::default();
        let group = PermutationGroup::empty();
        let request = JobRequest {
            start: &[0.0; 3],
            finish: &[0.0; 3],
            atom_count: 1,
            permutations: &group,
            files: &fx.files,
            controls: &controls,
        };
        let error = request.write_into(&fx.out).unwrap_err();
        assert!(matches!(error, SpawnError::CopyInput { .. }));
        assert_eq!(error.workdir(), Some(&fx.out));
    }
}
