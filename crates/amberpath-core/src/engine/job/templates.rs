//! Fixed file names and control-file text of the engine's working-directory protocol.

pub const START_FILE: &str = "start";
pub const FINISH_FILE: &str = "finish";
pub const PRMTOP_FILE: &str = "coords.prmtop";
pub const INPCRD_FILE: &str = "coords.inpcrd";
pub const MINIMIZATION_FILE: &str = "min.in";
pub const PERM_ALLOW_FILE: &str = "perm.allow";
pub const OPTIONS_FILE: &str = "odata";

/// Written by the engine when a connected pathway was assembled.
pub const PATH_INFO_FILE: &str = "path.info";

pub const DEFAULT_ENGINE_LOG: &str = "OPTIM.out";

/// Prefix of every allocated working directory.
pub const WORKDIR_PREFIX: &str = "optimrun.";

/// Every file the job writes before launching the engine.
pub const INPUT_FILES: [&str; 7] = [
    START_FILE,
    FINISH_FILE,
    PRMTOP_FILE,
    INPCRD_FILE,
    MINIMIZATION_FILE,
    PERM_ALLOW_FILE,
    OPTIONS_FILE,
];

/// Single-step minimization stanza read by the engine's force-field interface.
pub const MINIMIZATION_CONTROL: &str = "
STOP
 &cntrl
  imin   = 1,
  ncyc = 1,
  maxcyc = 1,
  igb = 0,
  ntb    = 0,
  cut    = 999.99,
  rgbmax = 25.0,
  ifswitch = 1
 /
";

/// Connect-run keywords. The trailing blank line terminates the keyword block.
pub const OPTIONS: &str = "
DUMPALLPATHS

UPDATES 6000
NEWCONNECT 15 3 2.0 20.0 30 0.5
CHECKCHIRALITY
comment PATH dumps intermediate conformations along the path
PATH 100 1.0D-2
COMMENT NEWNEB 30 500 0.01
NEBK 10.0
comment DUMPNEBXYZ
AMBERIC
comment AMBERSTEP
DIJKSTRA EXP
DUMPALLPATHS
REOPTIMISEENDPOINTS
COMMENT MAXTSENERGY -4770.0
EDIFFTOL  1.0D-4
MAXERISE 1.0D-4 1.0D0
GEOMDIFFTOL  0.05D0
BFGSTS 500 10 100 0.01 100
NOIT
BFGSMIN 1.0D-6
PERMDIST
MAXSTEP  0.1
TRAD     0.2
MAXMAX   0.3
BFGSCONV 1.0D-6
PUSHOFF 0.1
STEPS 800
BFGSSTEPS 2000
MAXBFGS 0.1
NAB start

";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimization_control_is_a_single_step_namelist() {
        assert!(MINIMIZATION_CONTROL.starts_with("\nSTOP\n &cntrl\n"));
        assert!(MINIMIZATION_CONTROL.contains("  maxcyc = 1,\n"));
        assert!(MINIMIZATION_CONTROL.ends_with(" /\n"));
    }

    #[test]
    fn options_end_with_nab_keyword_and_blank_line() {
        assert!(OPTIONS.starts_with("\nDUMPALLPATHS\n\nUPDATES 6000\n"));
        assert!(OPTIONS.ends_with("NAB start\n\n"));
        assert_eq!(OPTIONS.matches("DUMPALLPATHS").count(), 2);
    }

    #[test]
    fn input_files_are_distinct() {
        let mut names = INPUT_FILES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INPUT_FILES.len());
    }
}
