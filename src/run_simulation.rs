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

use crate::Float;
use calendar::Period;
use clap::Parser;
use communication::{MetaOptions, SimulationModel};
use heat::{ThermalModel, ThermalModelOptions};
use model::{Model, SimulationStateHeader};
use std::borrow::Borrow;
use std::fs;
use utils::{round_away, ProgressBar};
use weather::Weather;

/// The options we can pass to the simulation
#[derive(Parser, Default)]
#[clap(author, version, about, long_about = None)]
pub struct SimOptions {
    /// The input building file (JSON/JSON5)
    #[clap(short = 'i')]
    pub input_file: String,

    /// The weather-series file (JSON, as produced by the weather
    /// pre-processor)
    #[clap(short = 'w')]
    pub weather_file: String,

    /// Specifies the path to which to write the results.
    /// If none is given, STDOUT is used
    #[clap(short = 'o')]
    pub output: Option<String>,

    /// The number of timesteps per hour in the simulation
    #[clap(short = 'n')]
    pub n: usize,
}

struct PreProcessData {
    sim_period: Period,
    full_header: Vec<String>,
    model: ThermalModel,
    weather: Weather,
}

fn pre_process(
    model: &Model,
    options: &SimOptions,
    state_header: &mut SimulationStateHeader,
) -> Result<PreProcessData, String> {
    if options.n == 0 {
        return Err("Parameter 'n' should be larger than 0".to_string());
    }
    let dt = 60. * 60. / options.n as Float;

    // Load weather
    let s = match fs::read_to_string(&options.weather_file) {
        Ok(v) => v,
        Err(_) => {
            return Err(format!(
                "Could not read weather file '{}'",
                options.weather_file
            ))
        }
    };
    let mut weather: Weather = serde_json::from_str(&s).map_err(|e| format!("{}", e))?;
    if weather.data.is_empty() {
        return Err(format!(
            "Weather file '{}' contains no data",
            options.weather_file
        ));
    }
    weather.sort_data();

    let start = weather.data[0].date;
    let end = weather.data[weather.data.len() - 1].date;
    let sim_period = Period::new(start, end, dt);

    let meta_options = MetaOptions {
        latitude: weather.location.latitude.to_radians(),
        longitude: weather.location.longitude.to_radians(),
        standard_meridian: (weather.location.timezone * 15.).to_radians(),
        elevation: weather.location.elevation,
    };

    // Create physics model
    let physics_model = ThermalModel::new(
        &meta_options,
        ThermalModelOptions::default(),
        model,
        state_header,
        options.n,
    )?;

    // Collect variables we need to report
    let full_header: Vec<String> = state_header
        .elements
        .iter()
        .map(|x| x.stringify(model))
        .collect();

    Ok(PreProcessData {
        sim_period,
        full_header,
        weather,
        model: physics_model,
    })
}

/// This function drives the simulation, after having parsed and
/// built the building and its state: it marches the whole weather
/// period, writing one CSV row per timestep into `out`.
pub fn run<T, M>(
    model: M,
    state_header: &mut SimulationStateHeader,
    options: &SimOptions,
    mut out: T,
) -> Result<(), String>
where
    T: std::io::Write,
    M: Borrow<Model>,
{
    let pre_process_data = pre_process(model.borrow(), options, state_header)?;

    let mut state = state_header
        .take_values()
        .ok_or("Could not take values from SimulationStateHeader")?;

    let mut memory = pre_process_data.model.allocate_memory()?;

    // Write header
    out.write_all(b"Date")
        .map_err(|e| format!("Could not write to output (header): {}", e))?;
    for column in pre_process_data.full_header.iter() {
        out.write_all(format!(",{}", column).as_bytes())
            .map_err(|e| format!("Could not write to output (header): {}", e))?;
    }
    out.write_all(b"\n")
        .map_err(|e| format!("Could not write to output (header newline): {}", e))?;

    /* ************************************ */
    /* SIMULATE THE WHOLE SIMULATION PERIOD */
    /* ************************************ */
    let progress = ProgressBar::new(pre_process_data.sim_period.n_steps());
    for date in pre_process_data.sim_period {
        // Physics
        pre_process_data.model.march(
            date,
            &pre_process_data.weather,
            model.borrow(),
            &mut state,
            &mut memory,
        )?;
        progress.tic();

        // Print all the values in the state
        out.write_all(format!("{}", date).as_bytes())
            .map_err(|e| format!("Could not write to output (date '{}'): {}", date, e))?;
        for i in 0..state.len() {
            let v = round_away(state[i], 3);
            out.write_all(format!(",{:.3}", v).as_bytes())
                .map_err(|e| format!("Could not write to output (data): {}", e))?;
        }
        out.write_all(b"\n")
            .map_err(|e| format!("Could not write to output (newline): {}", e))?;
    }
    progress.done();

    Ok(())
}

/***********/
/* TESTING */
/***********/
