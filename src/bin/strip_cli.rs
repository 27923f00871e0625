#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("strip_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::f64::consts::{PI, TAU};
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use strip_engine::geom::{
        Arc3, Circle3, CubicBezier3, Frame, GeomMesh, Helix3, Line3, Point3, StripTimingReport,
        Vec3,
    };
    use strip_engine::strip::{Morph, ScalarSpec, SharedCurve, Strip, StripEnv, UvPreset};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"strip_cli (strip-engine)

USAGE:
  strip_cli list
  strip_cli run <scenario|all> [options]

SCENARIOS:
  straight
  helix
  twisted
  tapered
  morphing
  uv

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write snapshot (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_name(&scenario_name)
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_name(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.mesh, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.mesh, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn print_summary(output: &ScenarioOutput) {
        let mut line = format!(
            "{}: vertices={} triangles={} morph_targets={}",
            output.name,
            output.mesh.vertex_count(),
            output.mesh.triangle_count(),
            output.mesh.morph_target_count()
        );
        if let Some(timing) = output.timing.as_ref() {
            let _ = write!(line, " | {:.3} ms", timing.total_ms());
        }
        eprintln!("{line}");
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn ensure_writable(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        ensure_writable(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;
        ensure_writable(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# strip-engine strip_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in &mesh.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        if let Some(uvs) = mesh.uvs.as_ref() {
            for uv in uvs {
                writeln!(w, "vt {} {}", uv[0], uv[1]).map_err(|e| format!("write obj: {e}"))?;
            }
        }

        for n in &mesh.normals {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        let has_uvs = mesh.uvs.is_some();
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (a + 1, b + 1, c + 1);
            let written = if has_uvs {
                writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")
            } else {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")
            };
            written.map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        // Folds -0.0 into 0.0.
        q + 0.0
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_values_line(out: &mut String, prefix: &str, values: &[f64]) {
        out.push_str(prefix);
        for value in values {
            out.push(' ');
            write_f64(out, *value);
        }
        out.push('\n');
    }

    fn write_mesh(out: &mut String, mesh: &GeomMesh) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
        let _ = writeln!(out, "mesh.has_uvs {}", mesh.uvs.is_some());
        let _ = writeln!(out, "mesh.morph_targets {}", mesh.morph_target_count());

        let _ = writeln!(out, "mesh.positions {}", mesh.positions.len());
        for p in &mesh.positions {
            write_values_line(out, "p", p);
        }

        let _ = writeln!(out, "mesh.indices {}", mesh.indices.len());
        for [a, b, c] in mesh.triangles() {
            let _ = writeln!(out, "i {a} {b} {c}");
        }

        let _ = writeln!(out, "mesh.normals {}", mesh.normals.len());
        for n in &mesh.normals {
            write_values_line(out, "n", n);
        }

        if let Some(uvs) = mesh.uvs.as_ref() {
            let _ = writeln!(out, "mesh.uvs {}", uvs.len());
            for uv in uvs {
                write_values_line(out, "uv", uv);
            }
        } else {
            let _ = writeln!(out, "mesh.uvs none");
        }

        for (k, (positions, normals)) in mesh
            .morph_positions
            .iter()
            .zip(&mesh.morph_normals)
            .enumerate()
        {
            let _ = writeln!(out, "morph.{k}.positions {}", positions.len());
            for p in positions {
                write_values_line(out, "mp", p);
            }
            let _ = writeln!(out, "morph.{k}.normals {}", normals.len());
            for n in normals {
                write_values_line(out, "mn", n);
            }
        }
        Ok(())
    }

    fn write_frames(out: &mut String, frames: &[Frame]) {
        let _ = writeln!(out, "frames {}", frames.len());
        for frame in frames {
            write_values_line(out, "t", &frame.tangent.to_array());
            write_values_line(out, "b", &frame.binormal.to_array());
            write_values_line(out, "n", &frame.normal.to_array());
        }
    }

    fn snapshot(op: &str, strip: &Strip, mesh: &GeomMesh) -> Result<String, String> {
        let mut out = String::new();
        let _ = writeln!(out, "# strip-engine snapshot v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        let _ = writeln!(out, "segment {}", strip.segment());
        write_frames(&mut out, strip.frames().unwrap_or_default());
        write_mesh(&mut out, mesh)?;
        Ok(normalize_snapshot_text(&out))
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        Straight,
        Helix,
        Twisted,
        Tapered,
        Morphing,
        Uv,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::Straight,
            Scenario::Helix,
            Scenario::Twisted,
            Scenario::Tapered,
            Scenario::Morphing,
            Scenario::Uv,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::Straight => "straight",
                Scenario::Helix => "helix",
                Scenario::Twisted => "twisted",
                Scenario::Tapered => "tapered",
                Scenario::Morphing => "morphing",
                Scenario::Uv => "uv",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        mesh: GeomMesh,
        timing: Option<StripTimingReport>,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        let env = StripEnv::geom();
        let strip = match scenario {
            Scenario::Straight => scenario_straight(&env),
            Scenario::Helix => scenario_helix(&env),
            Scenario::Twisted => scenario_twisted(&env),
            Scenario::Tapered => scenario_tapered(&env),
            Scenario::Morphing => scenario_morphing(&env),
            Scenario::Uv => scenario_uv(&env),
        }
        .map_err(|e| e.to_string())?;

        let name = scenario.name();
        let mesh = strip
            .geometry()
            .cloned()
            .ok_or_else(|| format!("{name}: strip produced no geometry"))?;
        let snapshot = snapshot(name, &strip, &mesh)?;

        Ok(ScenarioOutput {
            name,
            mesh,
            timing: strip.last_timing().cloned(),
            snapshot,
        })
    }

    type ScenarioResult = Result<Strip, strip_engine::strip::StripError>;

    fn scenario_straight(env: &StripEnv) -> ScenarioResult {
        let line: SharedCurve = Arc::new(Line3::new(Point3::ORIGIN, Point3::new(4.0, 0.0, 0.0)));
        Strip::with_defaults(env, line, 8)
    }

    fn scenario_helix(env: &StripEnv) -> ScenarioResult {
        let helix: SharedCurve = Arc::new(Helix3::new(Point3::ORIGIN, Vec3::Z, 2.0, 1.0, 2.0));
        Strip::new(env, helix, 64, 0.25, 0.0, Some(UvPreset::Rotate0.uv_fn()))
    }

    fn scenario_twisted(env: &StripEnv) -> ScenarioResult {
        let line: SharedCurve = Arc::new(Line3::new(Point3::ORIGIN, Point3::new(6.0, 0.0, 0.0)));
        let twist = ScalarSpec::sampled(|i, n| TAU * i as f64 / n as f64);
        Strip::new(env, line, 48, 0.4, twist, None)
    }

    fn scenario_tapered(env: &StripEnv) -> ScenarioResult {
        let bezier: SharedCurve = Arc::new(CubicBezier3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, -2.0, 1.0),
            Point3::new(4.0, 0.0, 1.0),
        ));
        let taper = ScalarSpec::sampled(|i, n| 0.5 * (1.0 - i as f64 / n as f64));
        Strip::new(env, bezier, 32, taper, 0.0, None)
    }

    fn scenario_morphing(env: &StripEnv) -> ScenarioResult {
        let line: SharedCurve = Arc::new(Line3::new(Point3::ORIGIN, Point3::new(PI, 0.0, 0.0)));
        let arc: SharedCurve = Arc::new(Arc3::new(Point3::ORIGIN, Vec3::Z, 1.0, 0.0, PI));
        let coil: SharedCurve = Arc::new(Helix3::new(Point3::ORIGIN, Vec3::X, 0.5, 1.0, 1.0));

        let mut strip = Strip::with_defaults(env, line, 24)?;
        strip.set_morphs(Some(vec![
            Morph::new(arc).with_radius(0.25),
            Morph::new(coil).with_tilt(ScalarSpec::Constant(0.5)),
        ]));
        Ok(strip)
    }

    fn scenario_uv(env: &StripEnv) -> ScenarioResult {
        let circle: SharedCurve = Arc::new(Circle3::new(Point3::ORIGIN, Vec3::Y, 1.5));
        let mut strip = Strip::with_defaults(env, circle, 24)?;
        strip.set_uv(Some(UvPreset::Rotate90.uv_fn()));
        Ok(strip)
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
