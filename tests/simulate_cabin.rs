/*
MIT License
Copyright (c)  Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Runs the whole pipeline over the two-room cabin: building file in,
//! CSV report out.

use calendar::Date;
use hygrotherm::run_simulation::{run, SimOptions};
use hygrotherm::{CurrentWeather, Float, Location, Model, Weather};

/// Two winter days of synthetic hourly weather, written to a
/// temporary file the way the weather pre-processor would
fn write_weather_file(name: &str) -> Result<String, String> {
    let mut weather = Weather {
        location: Location::default(),
        data: Vec::new(),
    };
    for day in 1..=2u8 {
        for hour in 0..24u8 {
            let h = hour as Float;
            // mild daily swing around 2 C, sun around noon
            let temperature = 2. + 5. * ((h - 14.) / 24. * 2. * std::f64::consts::PI).cos();
            let sun = if (8. ..18.).contains(&h) {
                400. * (1. - ((h - 13.) / 5.).powi(2)).max(0.)
            } else {
                0.
            };
            weather.data.push(CurrentWeather {
                date: Date {
                    month: 1,
                    day,
                    hour: h,
                },
                dry_bulb_temperature: temperature,
                relative_humidity: 0.7,
                global_horizontal_radiation: sun,
            });
        }
    }

    let path = std::env::temp_dir().join(name);
    let path = path.to_str().ok_or("bad temp path")?.to_string();
    let json = serde_json::to_string(&weather).map_err(|e| e.to_string())?;
    std::fs::write(&path, json).map_err(|e| e.to_string())?;
    Ok(path)
}

#[test]
fn test_simulate_cabin() -> Result<(), String> {
    let weather_file = write_weather_file("hygrotherm_cabin_weather.json")?;
    let options = SimOptions {
        input_file: "./tests/cabin/cabin.json5".into(),
        weather_file,
        output: None,
        n: 4,
    };

    let (model, mut state_header) = Model::from_file(&options.input_file)?;
    let mut out: Vec<u8> = Vec::new();
    run(&model, &mut state_header, &options, &mut out)?;

    let csv = String::from_utf8(out).map_err(|e| e.to_string())?;
    let mut lines = csv.lines();
    let header = lines.next().ok_or("empty report")?;
    assert!(header.starts_with("Date,"));
    assert!(header.contains("Living Dry Bulb Temperature [C]"));
    assert!(header.contains("Bedroom Operating Mode [-]"));
    assert!(header.contains("Living floor Temperature [C]"));

    let n_columns = header.split(',').count();
    let rows: Vec<&str> = lines.collect();
    // one row per timestep of the weather period
    let expected = hygrotherm::Period::new(
        Date {
            month: 1,
            day: 1,
            hour: 0.,
        },
        Date {
            month: 1,
            day: 2,
            hour: 23.,
        },
        900.,
    )
    .n_steps();
    assert_eq!(rows.len(), expected);

    let mut living_temperature_column = 0;
    for (i, name) in header.split(',').enumerate() {
        if name == "Living Dry Bulb Temperature [C]" {
            living_temperature_column = i;
        }
    }
    assert!(living_temperature_column > 0);

    for row in rows.iter() {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), n_columns);
        let t: Float = fields[living_temperature_column]
            .parse()
            .map_err(|_| format!("bad value '{}'", fields[living_temperature_column]))?;
        // the split keeps the living room within its comfort band,
        // give or take the reporting resolution
        assert!(
            (10. ..35.).contains(&t),
            "living room at {} C in row '{}'",
            t,
            row
        );
    }
    Ok(())
}
