use crate::biometric_client::{BiometricClient, BiometricService};
use crate::configuration::Settings;
use crate::routes::call::CallFlow;
use crate::routes::main_route;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}
impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let biometric_client = BiometricClient::new(&configuration.biometric)?;
        let call_flow = CallFlow::new(
            configuration.call_flow,
            Arc::new(biometric_client) as Arc<dyn BiometricService>,
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}:{}", configuration.application.host, port);
        let server = run(listener, call_flow, configuration.application.workers).await?;
        Ok(Self { port, server })
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

async fn run(
    listener: TcpListener,
    call_flow: CallFlow,
    workers: usize,
) -> Result<Server, anyhow::Error> {
    let call_flow = web::Data::new(call_flow);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(call_flow.clone())
            .configure(main_route)
    })
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}
