//! Prediction service commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use gateway::{DiabetesInput, GatewayClient, HeartDiseaseInput};

/// Which prediction service to call.
#[derive(Subcommand)]
pub enum PredictService {
    /// Heart-disease risk prediction
    Heart(HeartArgs),

    /// Diabetes risk prediction
    Diabetes(DiabetesArgs),
}

/// Inputs for the heart-disease model.
#[derive(Args)]
pub struct HeartArgs {
    /// Age in years
    #[arg(long)]
    age: i32,

    /// Gender code as the model was trained on
    #[arg(long)]
    gender: i32,

    /// Height in centimeters
    #[arg(long)]
    height: f64,

    /// Weight in kilograms
    #[arg(long)]
    weight: f64,

    /// Cholesterol level code
    #[arg(long)]
    cholesterol: i32,

    /// Glucose level code
    #[arg(long)]
    glucose: i32,

    /// Alcohol intake flag
    #[arg(long)]
    alcohol: i32,

    /// Systolic blood pressure
    #[arg(long)]
    systolic_bp: i32,

    /// Diastolic blood pressure
    #[arg(long)]
    diastolic_bp: i32,

    /// Smoking flag
    #[arg(long)]
    smoke: i32,

    /// Physical activity flag
    #[arg(long)]
    active: i32,
}

/// Inputs for the diabetes model.
#[derive(Args)]
pub struct DiabetesArgs {
    /// General health rating
    #[arg(long)]
    gen_hlth: i32,

    /// High blood pressure flag
    #[arg(long)]
    high_bp: i32,

    /// High cholesterol flag
    #[arg(long)]
    high_chol: i32,

    /// Age bucket as the model was trained on
    #[arg(long)]
    age: i32,

    /// Cholesterol check flag
    #[arg(long)]
    chol_check: i32,

    /// Heavy alcohol consumption flag
    #[arg(long)]
    hvy_alcohol_consump: i32,

    /// Sex code as the model was trained on
    #[arg(long)]
    sex: i32,

    /// Income bucket
    #[arg(long)]
    income: i32,

    /// Prior heart disease outcome value
    #[arg(long)]
    heart_disease_value: i32,

    /// Body mass index
    #[arg(long)]
    bmi: f64,

    /// Days of poor physical health in the last month
    #[arg(long)]
    phys_hlth: i32,
}

/// Calls the selected prediction service and prints the outcome.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn run(gateway: &GatewayClient, service: PredictService) -> Result<()> {
    match service {
        PredictService::Heart(args) => {
            let level = gateway
                .predict_heart_disease(&HeartDiseaseInput {
                    age: args.age,
                    gender: args.gender,
                    height: args.height,
                    weight: args.weight,
                    cholesterol: args.cholesterol,
                    glucose: args.glucose,
                    alcohol: args.alcohol,
                    systolic_bp: args.systolic_bp,
                    diastolic_bp: args.diastolic_bp,
                    smoke: args.smoke,
                    active: args.active,
                })
                .await?;

            println!("Heart-disease risk: {level}");
        }
        PredictService::Diabetes(args) => {
            let (level, probability) = gateway
                .predict_diabetes(&DiabetesInput {
                    gen_hlth: args.gen_hlth,
                    high_bp: args.high_bp,
                    high_chol: args.high_chol,
                    age: args.age,
                    chol_check: args.chol_check,
                    hvy_alcohol_consump: args.hvy_alcohol_consump,
                    sex: args.sex,
                    income: args.income,
                    heart_disease_value: args.heart_disease_value,
                    bmi: args.bmi,
                    phys_hlth: args.phys_hlth,
                })
                .await?;

            match probability {
                Some(probability) => {
                    println!("Diabetes risk: {level} (p={probability:.3})");
                }
                None => println!("Diabetes risk: {level}"),
            }
        }
    }

    Ok(())
}
