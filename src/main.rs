use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::{Error, Write};

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()
        .map_err(|e| Error::other(format!("Failed to load configuration: {e}")))?;

    let pool = create_pool(&config.database)
        .await
        .map_err(|e| Error::other(format!("Failed to connect to database: {e}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| Error::other(format!("Failed to run database migrations: {e}")))?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let identity_service = IdentityService::new(pool.clone(), jwt_service.clone());
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone());
    let gym_service = GymService::new(pool.clone());
    let gym_admin_link_service = GymAdminLinkService::new(pool.clone());
    let gym_member_link_service = GymMemberLinkService::new(pool.clone());
    let membership_plan_service = MembershipPlanService::new(pool.clone());
    let plan_price_service = PlanPriceService::new(pool.clone());
    let membership_service = MembershipService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone());
    let diet_plan_service = DietPlanService::new(pool.clone());
    let workout_plan_service = WorkoutPlanService::new(pool.clone());

    let allowed_origins = config.server.cors_allowed_origins.clone();

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&allowed_origins))
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(identity_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(gym_service.clone()))
            .app_data(web::Data::new(gym_admin_link_service.clone()))
            .app_data(web::Data::new(gym_member_link_service.clone()))
            .app_data(web::Data::new(membership_plan_service.clone()))
            .app_data(web::Data::new(plan_price_service.clone()))
            .app_data(web::Data::new(membership_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(diet_plan_service.clone()))
            .app_data(web::Data::new(workout_plan_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::gym_config)
                    .configure(handlers::gym_admin_link_config)
                    .configure(handlers::gym_member_link_config)
                    .configure(handlers::membership_plan_config)
                    .configure(handlers::plan_price_config)
                    .configure(handlers::membership_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::diet_plan_config)
                    .configure(handlers::workout_plan_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
