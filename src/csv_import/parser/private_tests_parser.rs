mod advanced {
    use crate::csv_import::{parse, ImportStatus, MAX_SAMPLE_ERRORS, TOO_MANY_ERRORS};
    use crate::Value;
    use rand::distributions::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const HEADER: &str = "period,location,product,volume,price,minVolume";

    fn good_line(rng: &mut StdRng, period: usize) -> String {
        let volume = Uniform::from(0..10_000);
        let locations = ["Madrid", "Barcelona", "\"Valencia, ES\"", "Bilbao"];
        format!(
            "{},{},Gasoline,{},1.5,{}",
            period,
            locations.choose(rng).unwrap(),
            volume.sample(rng),
            volume.sample(rng)
        )
    }

    /// Builds a CSV with `total` data lines of which `ragged` have a column missing.
    fn generate(seed: u64, total: usize, ragged: usize) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut kinds: Vec<bool> = (0..total).map(|idx| idx < ragged).collect();
        kinds.shuffle(&mut rng);

        let mut out = String::from(HEADER);
        out.push('\n');
        for (idx, is_ragged) in kinds.into_iter().enumerate() {
            let line = good_line(&mut rng, idx + 1);
            if is_ragged {
                let cut = line.rfind(',').unwrap();
                out.push_str(&line[..cut]);
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
        out
    }

    /// Half or more ragged lines always abort, and never more than five samples come back.
    #[test]
    fn abort_threshold_over_generated_inputs() {
        for (seed, total) in [(1u64, 2usize), (2, 9), (3, 40), (4, 250)] {
            let half = (total + 1) / 2;
            let import = parse(&generate(seed, total, half));
            assert_eq!(import.status, ImportStatus::Aborted, "total {}", total);
            assert!(import.rows.is_empty());
            assert_eq!(import.errors[0], TOO_MANY_ERRORS);
            assert_eq!(import.errors.len(), 1 + half.min(MAX_SAMPLE_ERRORS));
            assert_eq!(import.data_lines, total);
        }
    }

    /// Just under the threshold the good lines survive and every bad line is listed.
    #[test]
    fn below_threshold_keeps_good_rows() {
        for (seed, total) in [(5u64, 3usize), (6, 10), (7, 101)] {
            let ragged = (total - 1) / 2;
            let import = parse(&generate(seed, total, ragged));
            assert_eq!(import.status, ImportStatus::Complete, "total {}", total);
            assert_eq!(import.rows.len(), total - ragged);
            assert_eq!(import.errors.len(), ragged);
            for error in &import.errors {
                assert!(error.ends_with("Expected 6 columns, got 5"), "{}", error);
            }
        }
    }

    /// Quoted locations keep their comma and every numeric column is typed.
    #[test]
    fn generated_rows_are_typed() {
        let import = parse(&generate(11, 200, 0));
        assert_eq!(import.rows.len(), 200);
        for (idx, row) in import.rows.iter().enumerate() {
            assert_eq!(row["period"], Value::from((idx + 1) as i64));
            assert!(matches!(row["volume"], Value::Number(_)));
            assert!(matches!(row["price"], Value::Number(_)));
            let location = row["location"].as_str().unwrap();
            assert!(!location.contains('"'));
        }
        assert!(import
            .rows
            .iter()
            .any(|row| row["location"] == Value::from("Valencia, ES")));
    }
}
