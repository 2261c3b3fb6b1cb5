// C ABI shared by service libraries and the hosts that load them.
//
// Every service library exports exactly these five unmangled symbols:
//
//   void  start_service(void);
//   void  stop_service(void);
//   void* get_next_message(void);
//   void  free_message(void* msg);
//   void  set_message_callback(void (*cb)(void));
//
// A library implements them as one-line trampolines into a static
// `Service<_>` or `Standalone`, both of which implement `Bridge`:
//
//   lazy_static! {
//       static ref SERVICE: Service<QueueStore<Msg>> =
//           ServiceBuilder::new().with_name("mine").build_queue(worker);
//   }
//
//   #[no_mangle]
//   pub extern "C" fn get_next_message() -> *mut c_void {
//       SERVICE.next_message()
//   }

use std::ffi::c_void;

/// `void (*)(void)` as received by `set_message_callback`. Null maps to `None`.
pub type MessageCallback = Option<unsafe extern "C" fn()>;

/// Opaque message pointer crossing the boundary. Null means "no message".
pub type RawMessage = *mut c_void;

pub const START_SERVICE: &str = "start_service";
pub const STOP_SERVICE: &str = "stop_service";
pub const GET_NEXT_MESSAGE: &str = "get_next_message";
pub const FREE_MESSAGE: &str = "free_message";
pub const SET_MESSAGE_CALLBACK: &str = "set_message_callback";

/// The symbols a library must export before a host accepts it.
pub const MANDATORY_SYMBOLS: [&str; 5] = [
    START_SERVICE,
    STOP_SERVICE,
    GET_NEXT_MESSAGE,
    FREE_MESSAGE,
    SET_MESSAGE_CALLBACK,
];

// Resolved signatures of the mandatory symbols.
pub type StartServiceFn = unsafe extern "C" fn();
pub type StopServiceFn = unsafe extern "C" fn();
pub type GetNextMessageFn = unsafe extern "C" fn() -> RawMessage;
pub type FreeMessageFn = unsafe extern "C" fn(RawMessage);
pub type SetMessageCallbackFn = unsafe extern "C" fn(MessageCallback);
