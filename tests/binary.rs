#[cfg(feature = "binaries")]
mod binary {
  use assert_cmd::Command;
  use std::env::temp_dir;
  use std::fs;
  use std::process::id;

  #[cfg(not(windows))]
  fn get_rhevce_command() -> Command {
    let mut cmd = Command::cargo_bin("rhevce").unwrap();
    cmd.env_clear();
    cmd
  }

  #[cfg(windows)]
  // `env_clear` doesn't work on Windows: https://github.com/rust-lang/rust/issues/31259
  fn get_rhevce_command() -> Command {
    Command::cargo_bin("rhevce").unwrap()
  }

  fn get_common_cmd() -> Command {
    let mut cmd = get_rhevce_command();
    cmd
      .arg("--source-width")
      .arg("1920")
      .arg("--source-height")
      .arg("1080")
      .arg("--frame-rate")
      .arg("50")
      .arg("--frames-to-be-encoded")
      .arg("17")
      .arg("--intra-period")
      .arg("1");
    cmd
  }

  #[test]
  fn no_arguments_prints_usage_and_fails() {
    let mut cmd = get_rhevce_command();
    let assert = cmd.assert().failure();
    let output = assert.get_output();
    let text = format!(
      "{}{}",
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"));
  }

  #[test]
  fn valid_all_intra_configuration_succeeds() {
    get_common_cmd().assert().success();
  }

  #[test]
  fn constraint_violations_exit_nonzero_and_name_every_rule() {
    let mut cmd = get_common_cmd();
    let assert = cmd
      .arg("--qp")
      .arg("99")
      .arg("--max-num-merge-cand")
      .arg("7")
      .assert()
      .failure()
      .code(1);
    let stderr =
      String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("QP 99"));
    assert!(stderr.contains("merge candidates"));
  }

  #[test]
  fn config_file_keys_map_to_flags() {
    let mut path = temp_dir();
    path.push(format!("rhevce-test-{}.cfg", id()));
    fs::write(
      &path,
      "# encoder settings\n\
       SourceWidth: 1280\n\
       SourceHeight: 720\n\
       FrameRate: 60\n\
       FramesToBeEncoded: 8\n\
       IntraPeriod: 1\n\
       QP: 32\n",
    )
    .unwrap();

    let mut cmd = get_rhevce_command();
    cmd.arg("-c").arg(&path).assert().success();

    // The command line wins over the file: an illegal QP now fails.
    let mut cmd = get_rhevce_command();
    cmd.arg("-c").arg(&path).arg("--qp").arg("99").assert().failure();

    let _ = fs::remove_file(&path);
  }

  #[test]
  fn gop_entries_come_from_config_file_frames() {
    let mut path = temp_dir();
    path.push(format!("rhevce-test-gop-{}.cfg", id()));
    fs::write(
      &path,
      "SourceWidth: 1920\n\
       SourceHeight: 1080\n\
       FrameRate: 50\n\
       FramesToBeEncoded: 17\n\
       IntraPeriod: 16\n\
       GOPSize: 8\n\
       Frame1: B 8 1 0.442 0 0 0 4 4 -8 -10 -12 -16 0\n\
       Frame2: B 4 2 0.3536 0 0 1 2 3 -4 -6 4 0\n\
       Frame3: B 2 3 0.3536 0 0 2 2 4 -2 -4 2 6 0\n\
       Frame4: B 1 4 0.68 0 0 3 2 4 -1 1 3 7 0\n\
       Frame5: B 3 4 0.68 0 0 3 2 4 -1 -3 1 5 0\n\
       Frame6: B 6 3 0.3536 0 0 2 2 4 -2 -4 -6 2 0\n\
       Frame7: B 5 4 0.68 0 0 3 2 4 -1 -5 1 3 0\n\
       Frame8: B 7 4 0.68 0 0 3 2 4 -1 -3 -7 1 0\n",
    )
    .unwrap();

    let mut cmd = get_rhevce_command();
    cmd.arg("-c").arg(&path).assert().success();

    let _ = fs::remove_file(path);
  }

  #[test]
  fn missing_gop_templates_are_fatal() {
    let mut cmd = get_common_cmd();
    let assert = cmd
      .arg("--intra-period")
      .arg("16")
      .arg("--gop-size")
      .arg("8")
      .assert()
      .failure()
      .code(1);
    let stderr =
      String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("fewer reference picture sets"));
  }
}
